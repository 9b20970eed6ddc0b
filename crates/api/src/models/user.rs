//! User domain types.

use chrono::{DateTime, Utc};

use storepulse_core::{Email, Role, UserId};

/// An account holder (domain type).
///
/// The password hash is deliberately not part of this type; repositories
/// return it separately on the login path only.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name, 2-60 characters.
    pub name: String,
    /// Normalized email address.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Postal address, at most 400 characters.
    pub address: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user is a System Administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
