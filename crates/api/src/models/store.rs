//! Store domain types.

use chrono::{DateTime, Utc};

use storepulse_core::{StoreId, UserId};

/// A rateable store (domain type).
///
/// The average rating is not stored here; every read path computes it live
/// from the ratings table.
#[derive(Debug, Clone)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// Contact email. Stored as plain text; store contact addresses are not
    /// login identifiers and are not validated beyond presence.
    pub email: String,
    /// Street address, at most 400 characters.
    pub address: String,
    /// Owning user, if any.
    pub owner_id: Option<UserId>,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}
