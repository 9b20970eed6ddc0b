//! Rating route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use storepulse_core::{Score, StoreId};

use crate::db::RatingRepository;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Rating submission body.
///
/// Both fields are optional so that missing values produce the same 400 as
/// out-of-range ones, rather than a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub store_id: Option<StoreId>,
    pub score: Option<i64>,
}

/// Submit or replace a rating.
///
/// POST /api/ratings
///
/// Re-submitting for the same store replaces the previous score; the
/// database-level upsert guarantees at most one row per (user, store).
///
/// # Errors
///
/// Returns 400 for a missing store or out-of-range score, 404 when the
/// store does not exist.
pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SubmitRatingRequest>,
) -> Result<Json<MessageResponse>> {
    let invalid = || AppError::BadRequest("Invalid store or score (1-5)".to_owned());

    let store_id = body.store_id.ok_or_else(invalid)?;
    let score = body
        .score
        .and_then(|raw| Score::try_from(raw).ok())
        .ok_or_else(invalid)?;

    RatingRepository::new(state.pool())
        .upsert(user.id, store_id, score)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Store not found".to_owned()),
            other => AppError::Database(other),
        })?;

    tracing::debug!(user_id = %user.id, store_id = %store_id, score = %score, "rating recorded");

    Ok(Json(MessageResponse::new("Rating submitted successfully")))
}
