//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.
//!
//! Every error becomes a JSON body of the form
//! `{"detail": "...", "type": "...", "path": "/request/path"}`. The path is
//! filled in by [`crate::api::middleware::error_path_middleware`], which reads
//! the [`ErrorBody`] stored in the response extensions.

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Database errors raised by repositories
    #[error("{entity} with id {id} not found")]
    EntityNotFound { entity: String, id: String },

    #[error("{entity} with {filter} not found")]
    EntityNotFoundBy { entity: String, filter: String },

    #[error("{0}")]
    Validation(String),

    #[error("Failed to {operation}: {detail}")]
    DatabaseOperation { operation: String, detail: String },

    // Driver errors that escaped the repository layer
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Request body or query could not be accepted
    #[error("{0}")]
    InvalidRequest(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Category reported in the `type` field of an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DatabaseError,
    ValidationError,
    InternalError,
}

/// Error response body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Body used for panics and other unexpected failures.
    pub fn internal() -> Self {
        Self {
            detail: "Internal server error".to_string(),
            kind: ErrorKind::InternalError,
            path: None,
        }
    }

    /// Render as a response that the path middleware can recognise.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let mut response = (status, Json(&self)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl AppError {
    /// Get the category for client
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::EntityNotFound { .. }
            | AppError::EntityNotFoundBy { .. }
            | AppError::Validation(_)
            | AppError::DatabaseOperation { .. } => ErrorKind::DatabaseError,
            AppError::InvalidRequest(_) => ErrorKind::ValidationError,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EntityNotFound { .. } | AppError::EntityNotFoundBy { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_)
            | AppError::DatabaseOperation { .. }
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn detail(&self) -> String {
        match self {
            AppError::Database(_) => "Internal database error occurred".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Database(e) => tracing::error!("Unhandled database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Unhandled error: {}", msg),
            AppError::InvalidRequest(msg) => tracing::debug!("Rejected request: {}", msg),
            other => tracing::warn!("Database exception: {}", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let body = ErrorBody {
            detail: self.detail(),
            kind: self.kind(),
            path: None,
        };

        body.into_response_with_status(self.status())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str, id: impl Display) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str, id: impl Display) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity, id))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>, id: impl Display) -> Self {
        AppError::EntityNotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn not_found_by(entity: impl Into<String>, filter: impl Display) -> Self {
        AppError::EntityNotFoundBy {
            entity: entity.into(),
            filter: filter.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn operation(operation: impl Into<String>, detail: impl Display) -> Self {
        AppError::DatabaseOperation {
            operation: operation.into(),
            detail: detail.to_string(),
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        AppError::InvalidRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
