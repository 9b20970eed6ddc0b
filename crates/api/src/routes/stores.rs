//! Store route handlers.
//!
//! The admin listing, the two overview listings, and owner-or-admin scoped
//! CRUD. Scoping means a non-admin touching someone else's store sees a
//! plain 404.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storepulse_core::{Role, StoreId, UserId};

use crate::db::round_to_tenths;
use crate::db::stores::{NewStore, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAdmin, RequireStoreManager};
use crate::models::Store;
use crate::routes::MessageResponse;
use crate::services::policy;
use crate::state::AppState;

/// Maximum address length, matching the database column.
const MAX_ADDRESS_LENGTH: usize = 400;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Store creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    /// Honored only when the caller is an administrator.
    pub owner_id: Option<UserId>,
}

/// Store update request body; absent fields keep their current values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Honored only when the caller is an administrator.
    pub owner_id: Option<UserId>,
}

/// A store as returned from create/update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Store> for StoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            owner_id: store.owner_id,
            created_at: store.created_at,
            updated_at: store.updated_at,
        }
    }
}

/// Embedded owner in the admin listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
}

/// A store in the admin listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAdminResponse {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub owner: Option<OwnerResponse>,
    /// Live mean score, one decimal; 0 when unrated.
    pub rating: f64,
}

/// A store in the authenticated overview listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOverviewResponse {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    /// Live mean score, one decimal; 0 when unrated.
    pub rating: f64,
    /// The caller's own score; 0 when they have not rated this store.
    pub my_rating: i32,
    pub rating_count: i64,
}

/// A store in the unauthenticated guest listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStoreResponse {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub rating: f64,
    pub rating_count: i64,
}

// =============================================================================
// Validation
// =============================================================================

fn validate_store_fields(name: &str, email: &str, address: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Store name is required".to_owned()));
    }
    if email.trim().is_empty() {
        return Err(AppError::BadRequest("Store email is required".to_owned()));
    }
    if address.trim().is_empty() {
        return Err(AppError::BadRequest("Store address is required".to_owned()));
    }
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Address cannot exceed {MAX_ADDRESS_LENGTH} characters"
        )));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// List all stores with owner and live average.
///
/// GET /api/stores
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<StoreAdminResponse>>> {
    let stores = StoreRepository::new(state.pool()).list_with_owner().await?;

    let response = stores
        .into_iter()
        .map(|entry| StoreAdminResponse {
            id: entry.store.id,
            name: entry.store.name,
            address: entry.store.address,
            email: entry.store.email,
            owner: entry.owner.map(|o| OwnerResponse {
                id: o.id,
                name: o.name,
                email: o.email,
                address: o.address,
                role: o.role,
            }),
            rating: round_to_tenths(entry.average_score),
        })
        .collect();

    Ok(Json(response))
}

/// Create a store.
///
/// POST /api/stores
///
/// Non-admin callers always become the owner, whatever the payload says.
///
/// # Errors
///
/// Returns 400 on validation failure.
pub async fn create(
    State(state): State<AppState>,
    RequireStoreManager(user): RequireStoreManager,
    Json(body): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>)> {
    validate_store_fields(&body.name, &body.email, &body.address)?;

    let owner_id = policy::resolve_new_store_owner(&user, body.owner_id);

    let store = StoreRepository::new(state.pool())
        .create(&NewStore {
            name: body.name.trim().to_owned(),
            email: body.email.trim().to_owned(),
            address: body.address.trim().to_owned(),
            owner_id: Some(owner_id),
        })
        .await?;

    tracing::info!(store_id = %store.id, owner_id = %owner_id, "store created");

    Ok((StatusCode::CREATED, Json(store.into())))
}

/// Update a store the caller owns (or any store, for admins).
///
/// PUT /api/stores/{id}
///
/// # Errors
///
/// Returns 404 when the store does not exist or is not owned by the caller.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<StoreId>,
    Json(body): Json<UpdateStoreRequest>,
) -> Result<Json<StoreResponse>> {
    let repo = StoreRepository::new(state.pool());

    let mut store = repo
        .get_scoped(id, policy::owner_scope(&user))
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    if let Some(name) = body.name {
        store.name = name;
    }
    if let Some(email) = body.email {
        store.email = email;
    }
    if let Some(address) = body.address {
        store.address = address;
    }
    if let Some(owner_id) = body.owner_id
        && policy::can_reassign_owner(&user)
    {
        store.owner_id = Some(owner_id);
    }

    validate_store_fields(&store.name, &store.email, &store.address)?;

    let store = repo.save(&store).await?;

    Ok(Json(store.into()))
}

/// Delete a store the caller owns (or any store, for admins).
///
/// DELETE /api/stores/{id}
///
/// # Errors
///
/// Returns 404 when the store does not exist or is not owned by the caller.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<StoreId>,
) -> Result<Json<MessageResponse>> {
    let deleted = StoreRepository::new(state.pool())
        .delete_scoped(id, policy::owner_scope(&user))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Store not found".to_owned()));
    }

    tracing::info!(store_id = %id, deleted_by = %user.id, "store deleted");

    Ok(Json(MessageResponse::new("Store removed")))
}

/// List every store with the caller's own rating attached.
///
/// GET /api/public/stores
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn public_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<StoreOverviewResponse>>> {
    let stores = StoreRepository::new(state.pool())
        .list_overview(Some(user.id))
        .await?;

    let response = stores
        .into_iter()
        .map(|store| StoreOverviewResponse {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            rating: round_to_tenths(store.average_score),
            my_rating: store.viewer_score.unwrap_or(0),
            rating_count: store.rating_count,
        })
        .collect();

    Ok(Json(response))
}

/// List every store for unauthenticated visitors.
///
/// GET /api/guest/stores
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn guest_listing(
    State(state): State<AppState>,
) -> Result<Json<Vec<GuestStoreResponse>>> {
    let stores = StoreRepository::new(state.pool()).list_overview(None).await?;

    let response = stores
        .into_iter()
        .map(|store| GuestStoreResponse {
            id: store.id,
            name: store.name,
            email: store.email,
            address: store.address,
            rating: round_to_tenths(store.average_score),
            rating_count: store.rating_count,
        })
        .collect();

    Ok(Json(response))
}
