use std::{collections::HashSet, sync::Arc};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::Claims;
use crate::{config::ConfigError, error::AppError, models::User};

/// TokenState
///
/// Shared handle to the token service, pulled out of the app state via `FromRef`.
pub type TokenState = Arc<TokenService>;

/// TokenService
///
/// Issues and verifies HS256 tokens whose payload is `{"user": <UserClaim>}`.
///
/// The secret is injected once at construction and never read again from the
/// environment. Tokens carry no `exp`: they stay valid until the secret rotates.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::Empty("SECRET_KEY"));
        }

        // Pin the algorithm: a token whose header names anything else is rejected.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// issue
    ///
    /// Signs a token embedding the user's serialized projection (no password hash).
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let claims = Claims {
            user: user.serialized(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
    }

    /// verify
    ///
    /// Decodes and checks the signature. Every failure, whether a malformed
    /// structure, a bad signature, a foreign algorithm or an unexpected payload
    /// shape, is reported as `AppError::InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "token rejected");
                AppError::InvalidToken
            })
    }
}
