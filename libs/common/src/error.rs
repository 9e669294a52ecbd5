//! Custom error types for the common library
//!
//! `StoreError` is raised by the record store, `ApiError` is the single
//! error type every HTTP handler returns. Each `ApiError` variant maps to one
//! status code and one client-facing message inside the response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::response::Envelope;

/// Custom error type for record store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a JSON array of records
    #[error("Collection file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be converted to JSON
    #[error("Store serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A merged patch no longer describes a valid record
    #[error("Invalid record: {0}")]
    InvalidRecord(#[source] serde_json::Error),

    /// A uniqueness check rejected the new record
    #[error("{0}")]
    Conflict(String),

    /// The caller's version no longer matches the stored one
    #[error("Version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type shared by all request handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request collides with existing data
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The path exists but not for this HTTP method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Missing or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Optimistic concurrency check failed
    #[error("Record was modified by another request")]
    VersionConflict,

    /// Login throttling kicked in
    #[error("Too many login attempts")]
    TooManyRequests,

    /// The backing store can not be read
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Anything else
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Status code and client-facing message for this error
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            ApiError::VersionConflict => (
                StatusCode::CONFLICT,
                "Record was modified by another request".to_string(),
            ),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts, please try again later".to_string(),
            ),
            ApiError::StorageUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage unavailable".to_string(),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::VersionConflict { .. } => ApiError::VersionConflict,
            StoreError::InvalidRecord(e) => ApiError::Validation(format!("Invalid field value: {e}")),
            StoreError::Corrupt { .. } => ApiError::StorageUnavailable(err.to_string()),
            StoreError::Io(_) | StoreError::Serialize(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Envelope::failure(message)).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_client_statuses() {
        let conflict: ApiError = StoreError::Conflict("Username already exists".into()).into();
        assert_eq!(
            conflict.status_and_message(),
            (StatusCode::BAD_REQUEST, "Username already exists".to_string())
        );

        let stale: ApiError = StoreError::VersionConflict {
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(stale.status_and_message().0, StatusCode::CONFLICT);

        let io: ApiError = StoreError::Io(std::io::Error::other("disk gone")).into();
        assert_eq!(
            io.status_and_message(),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string()
            )
        );
    }

    #[test]
    fn wrong_method_is_405() {
        assert_eq!(
            ApiError::MethodNotAllowed.status_and_message(),
            (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string()
            )
        );
    }

    #[test]
    fn corrupt_collection_is_reported_as_unavailable() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: ApiError = StoreError::Corrupt {
            path: "products.json".into(),
            source,
        }
        .into();

        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(message, "Storage unavailable");
    }
}
