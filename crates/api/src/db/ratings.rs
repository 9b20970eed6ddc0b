//! Rating repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storepulse_core::{RatingId, Score, StoreId, UserId};

use super::RepositoryError;

// =============================================================================
// Output Types
// =============================================================================

/// A single review row for the owner dashboard: a score plus the rater's name.
#[derive(Debug, sqlx::FromRow)]
pub struct StoreReview {
    pub id: RatingId,
    pub rater_name: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// Aggregate over the ratings a user has given.
#[derive(Debug, Clone, Copy)]
pub struct GivenSummary {
    pub total: i64,
    /// Mean score given, unrounded; 0 when the user has rated nothing.
    pub average: f64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for rating database operations.
pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Submit or replace a rating in one atomic statement.
    ///
    /// The `ON CONFLICT` clause relies on the unique `(user_id, store_id)`
    /// constraint, so two concurrent submissions for the same pair can never
    /// produce two rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn upsert(
        &self,
        user_id: UserId,
        store_id: StoreId,
        score: Score,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO ratings (user_id, store_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, store_id)
            DO UPDATE SET score = EXCLUDED.score, updated_at = now()
            ",
        )
        .bind(user_id)
        .bind(store_id)
        .bind(score.as_i32())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// All reviews of a store, newest-first, with rater names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<StoreReview>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreReview>(
            r"
            SELECT r.id, u.name AS rater_name, r.score, r.created_at
            FROM ratings r
            JOIN users u ON u.id = r.user_id
            WHERE r.store_id = $1
            ORDER BY r.created_at DESC
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Count and mean of the ratings a user has given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn given_summary(&self, user_id: UserId) -> Result<GivenSummary, RepositoryError> {
        let (total, average): (i64, f64) = sqlx::query_as(
            r"
            SELECT COUNT(*), COALESCE(AVG(score), 0)::float8
            FROM ratings
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(GivenSummary { total, average })
    }
}
