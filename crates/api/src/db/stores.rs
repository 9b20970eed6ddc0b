//! Store repository for database operations.
//!
//! Ownership scoping is baked into the queries: non-admin callers look up
//! and delete stores through an owner filter, so a store someone else owns
//! is indistinguishable from a missing one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storepulse_core::{Role, StoreId, UserId};

use super::RepositoryError;
use crate::models::Store;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i32,
    name: String,
    email: String,
    address: String,
    owner_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            email: row.email,
            address: row.address,
            owner_id: row.owner_id.map(UserId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for the admin listing (store + owner + aggregate).
#[derive(Debug, sqlx::FromRow)]
struct StoreAdminRow {
    #[sqlx(flatten)]
    store: StoreRow,
    owner_name: Option<String>,
    owner_email: Option<String>,
    owner_address: Option<String>,
    owner_role: Option<String>,
    average_score: f64,
}

/// Internal row type for the public/guest overview listing.
#[derive(Debug, sqlx::FromRow)]
struct OverviewRow {
    id: i32,
    name: String,
    email: String,
    address: String,
    rating_count: i64,
    average_score: f64,
    viewer_score: Option<i32>,
}

// =============================================================================
// Input / Output Types
// =============================================================================

/// Validated input for inserting a new store.
#[derive(Debug)]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<UserId>,
}

/// Embedded owner details for the admin store listing.
#[derive(Debug)]
pub struct OwnerSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
}

/// A store with its owner and live average, for the admin listing.
#[derive(Debug)]
pub struct StoreWithOwner {
    pub store: Store,
    pub owner: Option<OwnerSummary>,
    /// Mean score over all ratings, unrounded; 0 when unrated.
    pub average_score: f64,
}

/// A store row in the public/guest listing.
#[derive(Debug)]
pub struct StoreOverview {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub rating_count: i64,
    /// Mean score over all ratings, unrounded; 0 when unrated.
    pub average_score: f64,
    /// The viewing user's own score, if they rated this store.
    pub viewer_score: Option<i32>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owner does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_store: &NewStore) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO stores (name, email, address, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, address, owner_id, created_at, updated_at
            ",
        )
        .bind(&new_store.name)
        .bind(&new_store.email)
        .bind(&new_store.address)
        .bind(new_store.owner_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict("owner does not exist".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get a store by ID, optionally restricted to a specific owner.
    ///
    /// With `owner_filter = None` (admin) any store matches; otherwise only a
    /// store owned by the given user is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_scoped(
        &self,
        id: StoreId,
        owner_filter: Option<UserId>,
    ) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, email, address, owner_id, created_at, updated_at
            FROM stores
            WHERE id = $1 AND ($2::int4 IS NULL OR owner_id = $2)
            ",
        )
        .bind(id)
        .bind(owner_filter)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Persist updated fields of a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store no longer exists.
    /// Returns `RepositoryError::Conflict` if a reassigned owner does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn save(&self, store: &Store) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            UPDATE stores
            SET name = $1, email = $2, address = $3, owner_id = $4, updated_at = now()
            WHERE id = $5
            RETURNING id, name, email, address, owner_id, created_at, updated_at
            ",
        )
        .bind(&store.name)
        .bind(&store.email)
        .bind(&store.address)
        .bind(store.owner_id)
        .bind(store.id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict("owner does not exist".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a store by ID, with the same owner scoping as [`Self::get_scoped`].
    ///
    /// Ratings of the store are removed by the `ON DELETE CASCADE` constraint.
    ///
    /// # Returns
    ///
    /// Returns `true` if a store was deleted, `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_scoped(
        &self,
        id: StoreId,
        owner_filter: Option<UserId>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM stores
            WHERE id = $1 AND ($2::int4 IS NULL OR owner_id = $2)
            ",
        )
        .bind(id)
        .bind(owner_filter)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all stores owned by a user, oldest-first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_owned_by(&self, owner: UserId) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, email, address, owner_id, created_at, updated_at
            FROM stores
            WHERE owner_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List all stores newest-first with embedded owner and live average,
    /// for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if an owner row is invalid.
    pub async fn list_with_owner(&self) -> Result<Vec<StoreWithOwner>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreAdminRow>(
            r"
            SELECT s.id, s.name, s.email, s.address, s.owner_id,
                   s.created_at, s.updated_at,
                   o.name AS owner_name, o.email AS owner_email,
                   o.address AS owner_address, o.role AS owner_role,
                   COALESCE(AVG(r.score), 0)::float8 AS average_score
            FROM stores s
            LEFT JOIN users o ON o.id = s.owner_id
            LEFT JOIN ratings r ON r.store_id = s.id
            GROUP BY s.id, o.id
            ORDER BY s.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let average_score = row.average_score;
                let owner = match (row.store.owner_id, row.owner_name, row.owner_email) {
                    (Some(id), Some(name), Some(email)) => {
                        let role: Role = row.owner_role.as_deref().unwrap_or_default().parse()
                            .map_err(|e| {
                                RepositoryError::DataCorruption(format!(
                                    "invalid role in database: {e}"
                                ))
                            })?;
                        Some(OwnerSummary {
                            id: UserId::new(id),
                            name,
                            email,
                            address: row.owner_address,
                            role,
                        })
                    }
                    _ => None,
                };
                Ok(StoreWithOwner {
                    store: row.store.into(),
                    owner,
                    average_score,
                })
            })
            .collect()
    }

    /// List every store with its rating count, live average, and (when a
    /// viewer is given) the viewer's own score.
    ///
    /// One grouped query; the per-store work the original frontend paid for
    /// in application memory happens in the database instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_overview(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<StoreOverview>, RepositoryError> {
        let rows = sqlx::query_as::<_, OverviewRow>(
            r"
            SELECT s.id, s.name, s.email, s.address,
                   COUNT(r.id) AS rating_count,
                   COALESCE(AVG(r.score), 0)::float8 AS average_score,
                   (SELECT score FROM ratings
                     WHERE store_id = s.id AND user_id = $1::int4) AS viewer_score
            FROM stores s
            LEFT JOIN ratings r ON r.store_id = s.id
            GROUP BY s.id
            ORDER BY s.id ASC
            ",
        )
        .bind(viewer)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StoreOverview {
                id: StoreId::new(row.id),
                name: row.name,
                email: row.email,
                address: row.address,
                rating_count: row.rating_count,
                average_score: row.average_score,
                viewer_score: row.viewer_score,
            })
            .collect())
    }
}
