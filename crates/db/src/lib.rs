pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

use eyre::Result;
use slotbook_core::errors::SlotbookError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Creates the process-wide connection pool. Call once at startup and share
/// the pool (or a [`store::PgStore`] wrapping it) by reference.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Wraps a driver error as a store failure.
pub(crate) fn store_failure(err: sqlx::Error) -> SlotbookError {
    SlotbookError::Database(eyre::Report::new(err))
}

/// True when `err` is a unique violation on the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error().is_some_and(|db_err| {
        db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
    })
}
