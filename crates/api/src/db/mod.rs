//! Database operations for the Storepulse `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Accounts for all three roles
//! - `stores` - Stores, each optionally owned by a user
//! - `ratings` - One row per (user, store) pair, 1-5 score
//!
//! Queries use the runtime `query_as`/`query` API with explicit row structs
//! (`sqlx::FromRow`) converted into domain types via `TryFrom`, so the crate
//! builds without a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p storepulse-cli -- migrate
//! ```

pub mod ratings;
pub mod stats;
pub mod stores;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use ratings::RatingRepository;
pub use stats::StatsRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// The pool is capped at 5 connections, matching the sizing the service was
/// deployed with.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url.expose_secret())
        .await
}

/// Round a mean score to one decimal place, the precision every dashboard
/// displays.
#[must_use]
pub fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
