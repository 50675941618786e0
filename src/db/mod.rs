//! Persistence gateway.
//!
//! Every public operation runs as one statement or inside one transaction against the
//! SQLite pool. The store enforces `NOT NULL`, length checks and the
//! `task_items.user_id -> users.id` foreign key; the functions here check the same
//! invariants up front so callers get a precise `AppError`.

pub mod seed;
pub mod task_items;
pub mod users;

use crate::{config::Config, error::AppError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub(crate) const USERS_TABLE: &str = "users";
pub(crate) const TASK_ITEMS_TABLE: &str = "task_items";

/// Opens a connection pool for `config.database_url`, creating the database file if needed.
///
/// In-memory databases live only as long as their connection, so they get a single
/// connection that is never recycled.
pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if config.database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    log::info!("Connected to database at {}", config.database_url);
    Ok(pool)
}

/// Ensures the schema exists and seeds an empty store.
pub async fn init(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    seed::seed_if_empty(pool).await?;
    Ok(())
}

/// Shorthand for tests and tools: `connect` followed by `init`.
pub async fn connect_and_init(config: &Config) -> Result<SqlitePool, AppError> {
    let pool = connect(config).await?;
    init(&pool).await?;
    Ok(pool)
}

pub(crate) async fn exists(
    conn: &mut SqliteConnection,
    table: &'static str,
    id: i64,
) -> Result<bool, AppError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", table);
    let found: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(conn).await?;
    Ok(found != 0)
}

/// Resolves an UPDATE that matched no row: if the row is gone the caller gets `NotFound`,
/// otherwise the write lost a race and the conflict is returned as is.
///
/// Callers run this inside the transaction that issued the UPDATE. SQLite serialises writers,
/// so with the current statements the `Conflict` arm is not reached in practice.
pub(crate) async fn conflict_or_not_found(
    conn: &mut SqliteConnection,
    table: &'static str,
    id: i64,
) -> AppError {
    match exists(conn, table, id).await {
        Ok(false) => AppError::NotFound(format!("No row {} in {}", id, table)),
        Ok(true) => AppError::Conflict(format!("Update of {} {} matched no row", table, id)),
        Err(err) => err,
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect_and_init(&Config::in_memory())
        .await
        .expect("in-memory database should initialise")
}
