//! User management route handlers (admin only).

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use storepulse_core::{Email, Role, UserId};

use crate::db::round_to_tenths;
use crate::db::users::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::routes::auth::SignupRequest;
use crate::services::{AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Response Types
// =============================================================================

/// A user in the admin listing.
///
/// `rating` is the mean score across the stores the user owns: `null` for
/// anyone who is not an owner with stores, `0.0` for an owner whose stores
/// have no ratings yet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub rating: Option<f64>,
}

/// A sanitized account, returned after admin creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub address: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            address: user.address,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List all users with their owner rating aggregates.
///
/// GET /api/users
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<UserListResponse>>> {
    let users = UserRepository::new(state.pool())
        .list_with_owner_stats()
        .await?;

    let response = users
        .into_iter()
        .map(|entry| {
            let rating = (entry.user.role == Role::StoreOwner && entry.store_count > 0)
                .then(|| round_to_tenths(entry.owned_average.unwrap_or(0.0)));
            UserListResponse {
                id: entry.user.id,
                name: entry.user.name,
                email: entry.user.email,
                role: entry.user.role,
                address: entry.user.address,
                created_at: entry.user.created_at,
                rating,
            }
        })
        .collect();

    Ok(Json(response))
}

/// Create an account as an administrator.
///
/// POST /api/users (also mounted as POST /api/auth/add-user)
///
/// # Errors
///
/// Returns 400 on validation failure or duplicate email.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserSummary>)> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .register(Registration {
            name: &body.name,
            email: &body.email,
            password: &body.password,
            address: body.address.as_deref(),
            role: body.role,
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "account created by admin");

    Ok((StatusCode::CREATED, Json(user.into())))
}
