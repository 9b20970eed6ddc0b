//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/signup         - Register an account, returns a token
//! POST /api/auth/login          - Login, returns a token
//! PUT  /api/auth/password       - Change password (auth)
//! POST /api/auth/add-user       - Create an account (admin)
//!
//! # Users (admin)
//! GET  /api/users               - All users with owner rating aggregates
//! POST /api/users               - Create an account
//!
//! # Stores
//! GET    /api/stores            - All stores with owner + average (admin)
//! POST   /api/stores            - Create a store (store owner or admin)
//! PUT    /api/stores/{id}       - Update a store (owner-or-admin scoped)
//! DELETE /api/stores/{id}       - Delete a store (owner-or-admin scoped)
//! GET    /api/public/stores     - Listing with the caller's own ratings (auth)
//! GET    /api/guest/stores      - Listing without personal data (no auth)
//!
//! # Ratings
//! POST /api/ratings             - Submit or replace a rating (auth)
//!
//! # Stats
//! GET  /api/stats/admin         - System counters (admin)
//! GET  /api/stats/store         - Per-store dashboards for owned stores (auth)
//! GET  /api/stats/user          - The caller's own rating activity (auth)
//! ```

pub mod auth;
pub mod ratings;
pub mod stats;
pub mod stores;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Plain `{"message": ...}` body used by several endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/password", put(auth::change_password))
        // Admin creating users; same handler as POST /api/users
        .route("/add-user", post(users::create))
}

/// Create the stats routes router.
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(stats::admin))
        .route("/store", get(stats::store))
        .route("/user", get(stats::user))
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth_routes())
        // Users (admin)
        .route("/users", get(users::list).post(users::create))
        // Stores
        .route("/stores", get(stores::list).post(stores::create))
        .route("/stores/{id}", put(stores::update).delete(stores::remove))
        .route("/public/stores", get(stores::public_listing))
        .route("/guest/stores", get(stores::guest_listing))
        // Ratings
        .route("/ratings", post(ratings::submit))
        // Stats
        .nest("/stats", stats_routes());

    Router::new().nest("/api", api)
}
