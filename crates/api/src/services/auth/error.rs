//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::jwt::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] storepulse_core::EmailError),

    /// Name outside the 2-60 character range.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Address longer than 400 characters.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token error.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
