//! System-wide counters for the admin dashboard.

use sqlx::PgPool;

use storepulse_core::Role;

use super::RepositoryError;

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemCounts {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
    /// Users with the Normal User role.
    pub active_users: i64,
}

/// Repository for system-wide statistics.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the admin dashboard counters as independent COUNT queries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn system_counts(&self) -> Result<SystemCounts, RepositoryError> {
        let total_users = self.count("SELECT COUNT(*) FROM users", None).await?;
        let total_stores = self.count("SELECT COUNT(*) FROM stores", None).await?;
        let total_ratings = self.count("SELECT COUNT(*) FROM ratings", None).await?;
        let active_users = self
            .count(
                "SELECT COUNT(*) FROM users WHERE role = $1",
                Some(Role::NormalUser.as_str()),
            )
            .await?;

        Ok(SystemCounts {
            total_users,
            total_stores,
            total_ratings,
            active_users,
        })
    }

    async fn count(&self, sql: &str, arg: Option<&str>) -> Result<i64, RepositoryError> {
        let mut query = sqlx::query_as::<_, (i64,)>(sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }
        let (count,) = query.fetch_one(self.pool).await?;
        Ok(count)
    }
}
