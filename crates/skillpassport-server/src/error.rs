//! Error types for the Skill Passport server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use skillpassport_chain::ChainError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Storage rejected a credential insert. The cause is only logged.
    #[error("Error issuing credential")]
    IssueFailed,

    /// Storage rejected an NFT insert. The cause is only logged.
    #[error("Error minting NFT for credential ID: {0}")]
    MintFailed(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ChainError> for AppError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::InvalidKind(_) => AppError::BadRequest("Invalid credential type.".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_)
            | AppError::IssueFailed
            | AppError::MintFailed(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Forbidden(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
