//! Core domain types.
//!
//! Validated newtypes shared by the API server and the CLI. Parsing happens
//! at the boundary; the rest of the code works with already-valid values.

pub mod email;
pub mod id;
pub mod role;
pub mod score;

pub use email::{Email, EmailError};
pub use id::{RatingId, StoreId, UserId};
pub use role::{Role, RoleParseError};
pub use score::{Score, ScoreError};
