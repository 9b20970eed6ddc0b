//! Authentication service.
//!
//! Account registration, login, and password change on top of bcrypt
//! hashing. Field validation lives here so signup, the admin add-user
//! endpoint, and the CLI seeder all enforce the same rules.

mod error;

pub use error::AuthError;

use sqlx::PgPool;

use storepulse_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;
/// bcrypt ignores everything past 72 bytes, so longer passwords are rejected
/// rather than silently truncated.
const MAX_PASSWORD_BYTES: usize = 72;

/// Name length bounds, matching the database CHECK constraint.
const NAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=60;
/// Maximum address length, matching the database column.
const MAX_ADDRESS_LENGTH: usize = 400;

/// Unvalidated registration input, straight from a request body.
#[derive(Debug)]
pub struct Registration<'r> {
    pub name: &'r str,
    pub email: &'r str,
    pub password: &'r str,
    pub address: Option<&'r str>,
    pub role: Option<Role>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account.
    ///
    /// The role defaults to Normal User when absent.
    ///
    /// # Errors
    ///
    /// Returns a validation variant if any field is out of range, and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn register(&self, input: Registration<'_>) -> Result<User, AuthError> {
        let name = validate_name(input.name)?;
        let email = Email::parse(input.email)?;
        validate_password(input.password)?;
        let address = validate_address(input.address)?;

        let password_hash = hash_password(input.password)?;

        let user = self
            .users
            .create(&NewUser {
                name,
                email,
                password_hash,
                address,
                role: input.role.unwrap_or_default(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Change a user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password does
    /// not match, and `AuthError::WeakPassword` if the new one fails
    /// validation.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let current_hash = self.users.get_password_hash(user_id).await?;
        verify_password(current_password, &current_hash)?;

        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }
}

// =============================================================================
// Validation & Hashing
// =============================================================================

/// Validate and trim a display name.
fn validate_name(name: &str) -> Result<String, AuthError> {
    let trimmed = name.trim();
    if !NAME_LENGTH.contains(&trimmed.chars().count()) {
        return Err(AuthError::InvalidName(format!(
            "name must be between {} and {} characters",
            NAME_LENGTH.start(),
            NAME_LENGTH.end()
        )));
    }
    Ok(trimmed.to_owned())
}

/// Validate an optional address.
fn validate_address(address: Option<&str>) -> Result<Option<String>, AuthError> {
    match address.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) if trimmed.chars().count() > MAX_ADDRESS_LENGTH => Err(
            AuthError::InvalidAddress(format!(
                "address cannot exceed {MAX_ADDRESS_LENGTH} characters"
            )),
        ),
        Some(trimmed) => Ok(Some(trimmed.to_owned())),
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::WeakPassword(format!(
            "password cannot exceed {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Hash a password with bcrypt at the default cost.
fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a bcrypt hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    match bcrypt::verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(AuthError::InvalidCredentials),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_bounds() {
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name(&"a".repeat(60)).is_ok());
        assert!(matches!(
            validate_name("J"),
            Err(AuthError::InvalidName(_))
        ));
        assert!(matches!(
            validate_name(&"a".repeat(61)),
            Err(AuthError::InvalidName(_))
        ));
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Jane Doe  ").unwrap(), "Jane Doe");
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(validate_address(None).unwrap(), None);
        assert_eq!(validate_address(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_address(Some("1 Main St")).unwrap().as_deref(),
            Some("1 Main St")
        );
        assert!(matches!(
            validate_address(Some(&"x".repeat(401))),
            Err(AuthError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("longenough").is_ok());
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password(&"p".repeat(73)),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_verify_password_roundtrip() {
        // Cost 4 keeps the test fast; the service itself uses DEFAULT_COST.
        let hash = bcrypt::hash("hunter2hunter2", 4).unwrap();
        assert!(verify_password("hunter2hunter2", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_bad_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("whatever12", "not-a-bcrypt-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
