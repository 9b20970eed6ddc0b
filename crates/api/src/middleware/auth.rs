//! Authentication extractors.
//!
//! Handlers declare the access level they need by taking one of the
//! extractors below. Each verifies the bearer token and re-loads the user
//! from the database, so a stale token can never carry a stale role.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::users::UserRepository;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct CurrentUser(pub User);

/// Extractor that additionally requires the System Administrator role.
pub struct RequireAdmin(pub User);

/// Extractor that requires the Store Owner or System Administrator role.
pub struct RequireStoreManager(pub User);

/// Error returned when authentication or role checks fail.
///
/// Role failures respond 401 (not 403), matching the original middleware.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// No bearer token in the Authorization header.
    MissingToken,
    /// Token failed verification.
    InvalidToken,
    /// Token was valid but the user no longer exists.
    UserNotFound,
    /// Authenticated but not an administrator.
    NotAdmin,
    /// Authenticated but neither a store owner nor an administrator.
    NotStoreOwner,
    /// The user lookup itself failed.
    Database,
}

impl AuthRejection {
    const fn message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Not authorized, no token",
            Self::InvalidToken => "Not authorized, token failed",
            Self::UserNotFound => "Not authorized, user not found",
            Self::NotAdmin => "Not authorized as an admin",
            Self::NotStoreOwner => "Not authorized as a store owner",
            Self::Database => "Internal server error",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Database => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}

/// Pull the bearer token out of the Authorization header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verify the request's token and load the user it refers to.
async fn authenticate(parts: &Parts, state: &AppState) -> Result<User, AuthRejection> {
    let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

    let user_id = state
        .jwt()
        .verify(token)
        .map_err(|_| AuthRejection::InvalidToken)?;

    UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "user lookup failed during authentication");
            AuthRejection::Database
        })?
        .ok_or(AuthRejection::UserNotFound)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if !user.is_admin() {
            return Err(AuthRejection::NotAdmin);
        }
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireStoreManager {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if !user.role.is_store_manager() {
            return Err(AuthRejection::NotStoreOwner);
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/stores");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            AuthRejection::MissingToken.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::NotAdmin.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Database.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
