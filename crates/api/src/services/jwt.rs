//! JWT issuing and verification.
//!
//! Tokens are HS256-signed with the shared `JWT_SECRET`, carry the user ID
//! in `sub`, and expire after 24 hours. There are no refresh tokens and no
//! revocation list; the auth extractor re-loads the user from the database
//! on every request, so the database role is always authoritative.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storepulse_core::UserId;

/// Token lifetime in hours.
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed (e.g., clock problems).
    #[error("failed to create token")]
    Creation,
    /// The token is malformed, tampered with, or expired.
    #[error("invalid or expired token")]
    Invalid,
}

/// Claims carried by a Storepulse token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID as a string.
    sub: String,
    /// Expiry as a unix timestamp.
    exp: usize,
}

/// Issues and verifies bearer tokens.
pub struct JwtHandler {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtHandler {
    /// Create a handler from the shared signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Creation` if signing fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let exp = Utc::now()
            .checked_add_signed(chrono::Duration::hours(TOKEN_LIFETIME_HOURS))
            .ok_or(TokenError::Creation)?
            .timestamp();
        let exp = usize::try_from(exp).map_err(|_| TokenError::Creation)?;

        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };

        tracing::debug!(user_id = %user_id, "issuing token");

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Creation)
    }

    /// Verify a token and extract the user ID.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the token fails validation or its
    /// subject is not a user ID.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;

        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn handler(secret: &str) -> JwtHandler {
        JwtHandler::new(&SecretString::from(secret.to_owned()))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let jwt = handler("test-signing-secret-0123456789ab");

        let token = jwt.issue(UserId::new(7)).unwrap();
        assert!(!token.is_empty());

        let user_id = jwt.verify(&token).unwrap();
        assert_eq!(user_id, UserId::new(7));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let jwt = handler("test-signing-secret-0123456789ab");
        assert!(matches!(
            jwt.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer = handler("first-signing-secret-0123456789a");
        let verifier = handler("other-signing-secret-0123456789a");

        let token = issuer.issue(UserId::new(1)).unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }
}
