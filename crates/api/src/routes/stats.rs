//! Statistics route handlers: the three per-role dashboards.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use storepulse_core::{RatingId, StoreId};

use crate::db::round_to_tenths;
use crate::db::{RatingRepository, StatsRepository, StoreRepository};
use crate::error::Result;
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::state::AppState;

// =============================================================================
// Response Types
// =============================================================================

/// System counters for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub total_ratings: i64,
    pub total_users: i64,
    pub total_stores: i64,
    pub active_users: i64,
}

/// Fixed-bucket histogram over the five possible scores.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct RatingHistogram {
    #[serde(rename = "1")]
    pub ones: i64,
    #[serde(rename = "2")]
    pub twos: i64,
    #[serde(rename = "3")]
    pub threes: i64,
    #[serde(rename = "4")]
    pub fours: i64,
    #[serde(rename = "5")]
    pub fives: i64,
}

impl RatingHistogram {
    /// Bucket a list of scores. Out-of-range values cannot occur (the
    /// database CHECK constraint forbids them) and are ignored.
    fn from_scores<I: IntoIterator<Item = i32>>(scores: I) -> Self {
        let mut histogram = Self::default();
        for score in scores {
            match score {
                1 => histogram.ones += 1,
                2 => histogram.twos += 1,
                3 => histogram.threes += 1,
                4 => histogram.fours += 1,
                5 => histogram.fives += 1,
                _ => {}
            }
        }
        histogram
    }
}

/// A single review in the owner dashboard.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: RatingId,
    /// The rater's display name.
    pub user: String,
    pub score: i32,
    pub date: DateTime<Utc>,
}

/// Dashboard entry for one owned store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedStoreStats {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub total_ratings: i64,
    /// Mean score, one decimal; 0 when unrated.
    pub average_rating: f64,
    pub rating_counts: RatingHistogram,
    /// Reverse-chronological review list.
    pub reviews: Vec<ReviewResponse>,
}

/// Owner dashboard: one entry per owned store.
#[derive(Debug, Serialize)]
pub struct StoreStatsResponse {
    pub stores: Vec<OwnedStoreStats>,
}

/// The caller's own rating activity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub total_reviews_given: i64,
    /// Mean score given, one decimal; 0 when the caller has rated nothing.
    pub average_rating_given: f64,
    pub member_since: DateTime<Utc>,
}

// =============================================================================
// Handlers
// =============================================================================

/// System-wide counters.
///
/// GET /api/stats/admin
///
/// # Errors
///
/// Returns 500 if a count query fails.
pub async fn admin(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<AdminStatsResponse>> {
    let counts = StatsRepository::new(state.pool()).system_counts().await?;

    Ok(Json(AdminStatsResponse {
        total_ratings: counts.total_ratings,
        total_users: counts.total_users,
        total_stores: counts.total_stores,
        active_users: counts.active_users,
    }))
}

/// Per-store dashboards for every store the caller owns.
///
/// GET /api/stats/store
///
/// Callers who own no stores get an empty list, whatever their role.
///
/// # Errors
///
/// Returns 500 if a query fails.
pub async fn store(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<StoreStatsResponse>> {
    let store_repo = StoreRepository::new(state.pool());
    let rating_repo = RatingRepository::new(state.pool());

    let owned = store_repo.list_owned_by(user.id).await?;

    let mut stores = Vec::with_capacity(owned.len());
    for store in owned {
        let reviews = rating_repo.list_for_store(store.id).await?;

        let total_ratings = reviews.len() as i64;
        let average_rating = if reviews.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let mean =
                f64::from(reviews.iter().map(|r| r.score).sum::<i32>()) / reviews.len() as f64;
            round_to_tenths(mean)
        };
        let rating_counts = RatingHistogram::from_scores(reviews.iter().map(|r| r.score));

        stores.push(OwnedStoreStats {
            id: store.id,
            name: store.name,
            address: store.address,
            email: store.email,
            total_ratings,
            average_rating,
            rating_counts,
            reviews: reviews
                .into_iter()
                .map(|r| ReviewResponse {
                    id: r.id,
                    user: r.rater_name,
                    score: r.score,
                    date: r.created_at,
                })
                .collect(),
        });
    }

    Ok(Json(StoreStatsResponse { stores }))
}

/// The caller's own rating activity.
///
/// GET /api/stats/user
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserStatsResponse>> {
    let summary = RatingRepository::new(state.pool())
        .given_summary(user.id)
        .await?;

    Ok(Json(UserStatsResponse {
        total_reviews_given: summary.total,
        average_rating_given: round_to_tenths(summary.average),
        member_since: user.created_at,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_buckets() {
        let histogram = RatingHistogram::from_scores([5, 5, 3, 1, 5]);
        assert_eq!(
            histogram,
            RatingHistogram {
                ones: 1,
                threes: 1,
                fives: 3,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_histogram_empty() {
        assert_eq!(
            RatingHistogram::from_scores(std::iter::empty::<i32>()),
            RatingHistogram::default()
        );
    }

    #[test]
    fn test_histogram_serializes_with_numeric_keys() {
        let histogram = RatingHistogram::from_scores([2, 2, 4]);
        let json = serde_json::to_value(&histogram).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"1": 0, "2": 2, "3": 0, "4": 1, "5": 0})
        );
    }
}
