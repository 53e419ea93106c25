//! REST backend for a trivia team game: games, the teams playing them and a pile of questions.
#![warn(missing_debug_implementations, rust_2018_idioms)]

#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

use std::time::Duration;

use anyhow::{anyhow, Error};
use dotenv::dotenv;
use tracing_subscriber::prelude::*;

#[macro_use]
mod macros;

mod config;
mod db;
mod errors;
mod games;
mod ids;
mod questions;
mod schema;
mod server;
mod stats;
mod teams;
mod validator;

use config::Config;

#[actix_web::main]
async fn main() -> anyhow::Result<(), Error> {
    init().await?;

    Ok(())
}

async fn init() -> anyhow::Result<(), Error> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| anyhow!("unable to initialize the tracing subscriber: {}", e))?;

    Config::init();

    let database_url = Config::database_url()?;

    debug!("running database migrations");
    db::migrate(&database_url).map_err(|e| anyhow!("unable to run the migrations: {}", e))?;

    let pool = db::build_connection_pool(
        &database_url,
        db::PoolSettings {
            max_size: Config::db_pool_size(),
            connection_timeout: Duration::from_secs(Config::db_connection_timeout()),
        },
    )
    .map_err(|e| anyhow!("unable to build the connection pool: {}", e))?;

    let questions = questions::QuestionFile::new(Config::questions_path());
    info!("serving questions from {}", questions.path().display());

    let address = format!("{}:{}", Config::api_host(), Config::api_port());
    info!("launching the actix webserver on {}", address);
    server::launch(pool, questions, address).await?;

    Ok(())
}
