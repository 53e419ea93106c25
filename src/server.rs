use actix_cors::Cors;
use actix_web::middleware::normalize::TrailingSlash;
use actix_web::{get, middleware, web, App, HttpRequest, HttpResponse, HttpServer};

use crate::db;
use crate::errors::ServiceError;
use crate::games;
use crate::questions;
use crate::stats;
use crate::teams;

pub type Response = Result<HttpResponse, ServiceError>;

/// request bodies are tiny, anything above this is refused
const JSON_LIMIT: usize = 4096;

#[get("/health")]
async fn health(_: HttpRequest) -> &'static str {
    "ok"
}

/// JSON extraction settings, malformed bodies are answered like any other bad request
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|error, _| {
            debug!("rejected request body: {}", error);
            ServiceError::BadRequest(error.to_string()).into()
        })
}

/// Every route, relative to the `/api` mount point
pub fn routes(cfg: &mut web::ServiceConfig) {
    questions::routes::register(cfg);
    games::routes::register(cfg);
    teams::routes::register(cfg);

    cfg.service(stats::route).service(health);
}

pub async fn launch(
    db_pool: db::Pool,
    questions: questions::QuestionFile,
    address: String,
) -> std::io::Result<()> {
    let stats = web::Data::new(stats::Stats::new());

    HttpServer::new(move || {
        App::new()
            .data(db_pool.clone())
            .data(questions.clone())
            .app_data(stats.clone())
            .app_data(json_config())
            .wrap(Cors::permissive())
            .wrap(middleware::DefaultHeaders::new().header("X-Version", env!("CARGO_PKG_VERSION")))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::new(TrailingSlash::Trim))
            .wrap(stats::RequestCounter::new(stats.clone().into_inner()))
            .service(web::scope("/api").configure(routes))
    })
    .bind(address)?
    .run()
    .await
}
