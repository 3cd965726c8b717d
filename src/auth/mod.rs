//! Authentication and authorization.
//!
//! The request pipeline is expressed through extractor types:
//!
//! - `Claims`: the token was present and verified (see `middleware`).
//! - `AdminClaims`: `Claims` whose user carries the admin flag (see `role`).
//!
//! Handlers opt into a stage simply by taking the corresponding type as their
//! first argument.

use serde::{Deserialize, Serialize};

use crate::models::UserClaim;

pub mod middleware;
pub mod password;
pub mod role;
pub mod token;

pub use middleware::authenticate;
pub use role::{AdminClaims, require_admin};
pub use token::{TokenService, TokenState};

/// Request header carrying the access token on every protected endpoint.
pub const TOKEN_HEADER: &str = "x-access-token";

/// Claims
///
/// Decoded token payload: the serialized user as it was at login time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user: UserClaim,
}
