//! User roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Account role, stored as text in the database and on the wire.
///
/// The wire/database representation uses the human-readable names the
/// frontend displays ("System Administrator", "Normal User", "Store Owner").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Full CRUD over users and stores, plus system-wide stats.
    #[serde(rename = "System Administrator")]
    SystemAdministrator,
    /// Can browse stores and submit ratings.
    #[default]
    #[serde(rename = "Normal User")]
    NormalUser,
    /// Manages one or more stores and views their stats.
    #[serde(rename = "Store Owner")]
    StoreOwner,
}

/// Error returned when a string is not a known role.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl Role {
    /// The canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SystemAdministrator => "System Administrator",
            Self::NormalUser => "Normal User",
            Self::StoreOwner => "Store Owner",
        }
    }

    /// Whether this role has administrator privileges.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::SystemAdministrator)
    }

    /// Whether this role may create and manage stores.
    ///
    /// Administrators are implicitly store managers, matching the original
    /// access rules where every owner-level route also admits admins.
    #[must_use]
    pub const fn is_store_manager(&self) -> bool {
        matches!(self, Self::StoreOwner | Self::SystemAdministrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "System Administrator" => Ok(Self::SystemAdministrator),
            "Normal User" => Ok(Self::NormalUser),
            "Store Owner" => Ok(Self::StoreOwner),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_roles() {
        for role in [
            Role::SystemAdministrator,
            Role::NormalUser,
            Role::StoreOwner,
        ] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "Superuser".parse::<Role>().unwrap_err();
        assert_eq!(err, RoleParseError("Superuser".to_owned()));
    }

    #[test]
    fn test_default_is_normal_user() {
        assert_eq!(Role::default(), Role::NormalUser);
    }

    #[test]
    fn test_privilege_predicates() {
        assert!(Role::SystemAdministrator.is_admin());
        assert!(Role::SystemAdministrator.is_store_manager());
        assert!(Role::StoreOwner.is_store_manager());
        assert!(!Role::StoreOwner.is_admin());
        assert!(!Role::NormalUser.is_store_manager());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Role::StoreOwner).unwrap();
        assert_eq!(json, "\"Store Owner\"");
        let back: Role = serde_json::from_str("\"System Administrator\"").unwrap();
        assert_eq!(back, Role::SystemAdministrator);
    }
}
