use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use super::{Claims, TOKEN_HEADER, token::{TokenService, TokenState}};
use crate::error::AppError;

/// authenticate
///
/// The authentication stage: Unauthenticated → {Authenticated, Rejected}.
///
/// 1. No usable `x-access-token` header → `MissingToken`.
/// 2. Header present → `TokenService::verify`; any failure → `InvalidToken`.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Claims, AppError> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingToken)?;

    tokens.verify(token)
}

/// Claims Extractor Implementation
///
/// Any handler that names `Claims` in its signature is protected: the request
/// never reaches the handler body unless the token verified. Handlers take it as
/// their first argument so the authenticated identity is explicit.
///
/// Rejection: `AppError::MissingToken` or `AppError::InvalidToken` (401).
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
    TokenState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenState::from_ref(state);
        let claims = authenticate(&parts.headers, &tokens)?;

        tracing::debug!(user = %claims.user.name, admin = claims.user.admin, "token accepted");
        Ok(claims)
    }
}
