use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::{Claims, token::TokenState};
use crate::{error::AppError, models::UserClaim};

/// AdminClaims
///
/// Claims that passed the admin gate. The inner value is private, so the only
/// ways to obtain one are `require_admin` and the extractor below, and both
/// start from an already verified `Claims`. Gating before authentication is
/// therefore unrepresentable.
#[derive(Debug, Clone)]
pub struct AdminClaims(Claims);

impl AdminClaims {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn user(&self) -> &UserClaim {
        &self.0.user
    }

    pub fn into_inner(self) -> Claims {
        self.0
    }
}

/// require_admin
///
/// The role gate. Forwards the claims unchanged when `user.admin` is true,
/// otherwise rejects with `Forbidden`.
pub fn require_admin(claims: Claims) -> Result<AdminClaims, AppError> {
    if claims.user.admin {
        Ok(AdminClaims(claims))
    } else {
        Err(AppError::Forbidden)
    }
}

impl TryFrom<Claims> for AdminClaims {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        require_admin(claims)
    }
}

/// AdminClaims Extractor Implementation
///
/// Runs the `Claims` extractor first (so missing/invalid tokens are reported as
/// such) and only then applies the role gate.
impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
    TokenState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = Claims::from_request_parts(parts, state).await?;
        require_admin(claims)
    }
}
