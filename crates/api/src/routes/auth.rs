//! Authentication route handlers.
//!
//! Signup and login both respond with the session shape the frontend
//! stores: the sanitized account fields plus a bearer token.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use storepulse_core::{Email, Role, UserId};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::routes::MessageResponse;
use crate::services::{AuthError, AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
    pub role: Option<Role>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Session payload: sanitized account fields plus a bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub token: String,
}

impl SessionResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account and log it in.
///
/// POST /api/auth/signup
///
/// # Errors
///
/// Returns 400 on validation failure or duplicate email.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
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

    let token = state.jwt().issue(user.id).map_err(AuthError::from)?;

    tracing::info!(user_id = %user.id, role = %user.role, "account created");

    Ok((StatusCode::CREATED, Json(SessionResponse::new(user, token))))
}

/// Login with email and password.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns 401 on invalid credentials.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let auth = AuthService::new(state.pool());

    let user = auth.login(&body.email, &body.password).await?;
    let token = state.jwt().issue(user.id).map_err(AuthError::from)?;

    Ok(Json(SessionResponse::new(user, token)))
}

/// Change the caller's password.
///
/// PUT /api/auth/password
///
/// # Errors
///
/// Returns 401 if the current password does not verify, 400 if the new
/// password fails validation.
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool());

    auth.change_password(user.id, &body.current_password, &body.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
