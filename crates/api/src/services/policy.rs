//! Authorization policy.
//!
//! Every role decision the handlers make goes through these functions, so
//! the rules live in one place instead of being branched on inline.

use storepulse_core::UserId;

use crate::models::User;

/// The owner filter a user operates under when reading, updating, or
/// deleting stores.
///
/// `None` means unrestricted (System Administrator); `Some(id)` restricts
/// every store lookup to stores owned by that user, which is what turns
/// "someone else's store" into a 404.
#[must_use]
pub fn owner_scope(user: &User) -> Option<UserId> {
    if user.is_admin() { None } else { Some(user.id) }
}

/// Whether a user may create stores at all.
#[must_use]
pub const fn can_create_stores(user: &User) -> bool {
    user.role.is_store_manager()
}

/// Resolve the owner of a store being created.
///
/// Administrators may assign any owner; everyone else becomes the owner
/// themselves, regardless of what the payload asked for.
#[must_use]
pub fn resolve_new_store_owner(creator: &User, requested: Option<UserId>) -> UserId {
    match requested {
        Some(owner) if creator.is_admin() => owner,
        _ => creator.id,
    }
}

/// Whether a user may reassign a store's owner on update.
#[must_use]
pub const fn can_reassign_owner(user: &User) -> bool {
    user.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storepulse_core::{Email, Role};

    #[allow(clippy::unwrap_used)]
    fn user(id: i32, role: Role) -> User {
        User {
            id: UserId::new(id),
            name: "Test User".to_owned(),
            email: Email::parse("test@example.com").unwrap(),
            role,
            address: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_scope() {
        assert_eq!(owner_scope(&user(1, Role::SystemAdministrator)), None);
        assert_eq!(
            owner_scope(&user(2, Role::StoreOwner)),
            Some(UserId::new(2))
        );
        assert_eq!(
            owner_scope(&user(3, Role::NormalUser)),
            Some(UserId::new(3))
        );
    }

    #[test]
    fn test_can_create_stores() {
        assert!(can_create_stores(&user(1, Role::SystemAdministrator)));
        assert!(can_create_stores(&user(2, Role::StoreOwner)));
        assert!(!can_create_stores(&user(3, Role::NormalUser)));
    }

    #[test]
    fn test_non_admin_always_owns_created_store() {
        let owner = user(5, Role::StoreOwner);
        assert_eq!(
            resolve_new_store_owner(&owner, Some(UserId::new(99))),
            UserId::new(5)
        );
        assert_eq!(resolve_new_store_owner(&owner, None), UserId::new(5));
    }

    #[test]
    fn test_admin_may_assign_owner() {
        let admin = user(1, Role::SystemAdministrator);
        assert_eq!(
            resolve_new_store_owner(&admin, Some(UserId::new(42))),
            UserId::new(42)
        );
        // Admin without an explicit owner becomes the owner, as in the
        // original create handler.
        assert_eq!(resolve_new_store_owner(&admin, None), UserId::new(1));
    }
}
