//! Business logic services.

pub mod auth;
pub mod jwt;
pub mod policy;

pub use auth::{AuthError, AuthService, Registration};
pub use jwt::{JwtHandler, TokenError};
