//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers obtain a connection from the pool, or open a transaction, and pass it through. Every function
//! returns the raw `sqlx::Error`; [`SqliteDatabase`](super::SqliteDatabase) translates it at the trait boundary.
use std::{env, str::FromStr};

use log::*;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    Sqlite,
    SqlitePool,
};

pub mod certificates;
pub mod healthcheck;
pub mod reconciliation;

pub const SQLITE_DB_URL: &str = "sqlite://data/acts_store.db";
/// Extra connections allowed above the configured pool size when the pool is under pressure.
pub const POOL_OVERFLOW: u32 = 15;

/// Picks the latest status snapshot per order. Ties on `created_at` go to the highest row id.
pub(crate) const LATEST_STATUS_CTE: &str = r#"
    latest_status AS (
        SELECT order_id, supply_id, status
        FROM (
            SELECT order_id, supply_id, status,
                   ROW_NUMBER() OVER (PARTITION BY order_id ORDER BY created_at DESC, id DESC) AS position
            FROM order_status_log
        )
        WHERE position = 1
    )"#;

pub fn db_url() -> String {
    let result = env::var("ACTS_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ ACTS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

/// Creates a pool that keeps `pool_size` connections open and grows to `pool_size + POOL_OVERFLOW` under load.
pub async fn new_pool(url: &str, pool_size: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .min_connections(pool_size)
        .max_connections(pool_size + POOL_OVERFLOW)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn create_database_if_missing(url: &str) -> Result<(), SqlxError> {
    if !Sqlite::database_exists(url).await? {
        Sqlite::create_database(url).await?;
        info!("🗃️ Created Sqlite database {url}");
    }
    Ok(())
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqlxError> {
    sqlx::migrate!("./src/sqlite/migrations").run(pool).await?;
    debug!("🗃️ Migrations complete");
    Ok(())
}
