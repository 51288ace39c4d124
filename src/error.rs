use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::models::ApiResponse;
use crate::services::{PostgresError, ProfileStoreError};

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Profile store unreachable: {0}")]
    ConnectionFailed(String),

    #[error("Profile store error: {0}")]
    Upstream(String),

    #[error("Suggestion persistence is disabled")]
    PersistenceDisabled,

    #[error("Database error: {0}")]
    Database(#[from] PostgresError),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl AppError {
    /// Machine-readable code placed in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_failed",
            AppError::NotFound(_) => "not_found",
            AppError::ConnectionFailed(_) => "connection_failed",
            AppError::Upstream(_) => "upstream_error",
            AppError::PersistenceDisabled => "persistence_disabled",
            AppError::Database(_) => "database_error",
            AppError::InvalidJson(_) => "invalid_json",
            AppError::InvalidQuery(_) => "invalid_query",
        }
    }
}

impl From<ProfileStoreError> for AppError {
    fn from(err: ProfileStoreError) -> Self {
        match err {
            ProfileStoreError::NotFound(message) => AppError::NotFound(message),
            ProfileStoreError::ConnectionFailed(message) => AppError::ConnectionFailed(message),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl error::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidJson(_) | AppError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConnectionFailed(_) | AppError::PersistenceDisabled => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::failure(self.code(), self.to_string()))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    AppError::InvalidJson(err.to_string()).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    AppError::InvalidQuery(err.to_string()).into()
}
