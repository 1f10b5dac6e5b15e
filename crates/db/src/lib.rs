//! Persistence layer for EventEase.
//!
//! Models mirror the `venues`, `events` and `bookings` tables; repositories
//! are zero-sized structs whose methods take `&PgPool`. Check-then-write
//! operations (validated booking creation, guarded deletes) run inside a
//! single transaction.

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
