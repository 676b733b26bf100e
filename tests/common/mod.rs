//! Shared test infrastructure for model layer tests.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use momtrack::db::{DbPool, MIGRATIONS};

/// Open an in-memory SQLite database with the schema applied.
///
/// The pool is capped at a single connection — every connection to
/// `:memory:` is its own database, so one shared connection keeps the
/// data visible to the whole test. Foreign keys are enforced to match
/// the runtime configuration.
pub async fn setup_test_db() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Bad test DB URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open test DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
