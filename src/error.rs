use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

/// AppError
///
/// Every failure a request can end in. The `Display` text is the exact message
/// returned to the client in the `{"message": ...}` body.
///
/// Authentication and authorization failures (`MissingToken`, `InvalidToken`,
/// `Forbidden`) are produced only by the `Claims`/`AdminClaims` extractors and
/// never reach a domain handler.
#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("Token is missing.")]
    MissingToken,

    /// Malformed token, bad signature or foreign algorithm. Callers never learn which.
    #[error("Invalid Token. Login Again.")]
    InvalidToken,

    #[error("You are not allowed to perform this action.")]
    Forbidden,

    #[error("Please enter all the required details to login.")]
    MissingCredentials,

    #[error("Username does not exist.")]
    UnknownUser,

    #[error("Unable to verify.")]
    BadCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

/// MessageResponse
///
/// The body of every error response, and of the message-only success responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Earlier releases sent these with a 200 status.
            AppError::MissingToken | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            // Existing clients expect 401 here, not 403.
            AppError::Forbidden => StatusCode::UNAUTHORIZED,
            AppError::MissingCredentials | AppError::UnknownUser => StatusCode::UNAUTHORIZED,
            AppError::BadCredentials => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
            }
            AppError::Forbidden => tracing::warn!("non-admin caller rejected"),
            _ => tracing::debug!(error = %self, status = status.as_u16(), "request rejected"),
        }

        // Internal details stay in the logs.
        let message = match self {
            AppError::Internal(_) => "Internal server error.".to_string(),
            other => other.to_string(),
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(format!("database error: {}", e))
    }
}
