embed_migrations!("migrations/");

use std::time::Duration;

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::PgConnection;

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type Conn = PgConnection;

/// Sizing of the connection pool
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_size: u32,
    /// how long a request waits for a free connection before failing
    pub connection_timeout: Duration,
}

fn connect(database_url: &str) -> diesel::ConnectionResult<PgConnection> {
    PgConnection::establish(database_url)
}

pub fn migrate(database_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let connection = connect(database_url)?;
    embedded_migrations::run_with_output(&connection, &mut std::io::stdout())?;

    Ok(())
}

pub fn build_connection_pool(
    database_url: &str,
    settings: PoolSettings,
) -> Result<Pool, Box<dyn std::error::Error>> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool: Pool = r2d2::Pool::builder()
        .max_size(settings.max_size)
        .connection_timeout(settings.connection_timeout)
        .build(manager)?;

    Ok(pool)
}

/// A pool pointing at a port nothing listens on, for exercising routes
/// without a database. Checkouts fail after half a second.
#[cfg(test)]
pub fn unreachable_pool() -> Pool {
    let manager =
        ConnectionManager::<PgConnection>::new("postgres://gamification@127.0.0.1:1/gamification");

    r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_millis(500))
        .build_unchecked(manager)
}

/// A migrated connection to the database in `DATABASE_URL`, inside a
/// transaction that is rolled back when the connection drops.
///
/// Run the tests that use it with:
/// `DATABASE_URL=postgres://... cargo test -- --ignored`
#[cfg(test)]
pub fn test_connection() -> PgConnection {
    static MIGRATIONS: std::sync::Once = std::sync::Once::new();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    MIGRATIONS.call_once(|| migrate(&database_url).expect("migrations failed"));

    let conn = connect(&database_url).expect("connection failed");
    conn.begin_test_transaction()
        .expect("unable to start the test transaction");

    conn
}
