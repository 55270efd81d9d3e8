//! Error types for the reminder server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::TaskId;

// == Task Error Enum ==
/// Unified error type for the reminder server.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The task store could not be read or written as a whole
    #[error("Task store unavailable: {0}")]
    StoreUnavailable(String),

    /// A single record could not be persisted during a batch
    #[error("Failed to write task {id}: {reason}")]
    RecordWriteFailed { id: TaskId, reason: String },

    /// Referenced task no longer exists
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// No built-in preset has this name
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// Attributes a failed write to the record `id`.
    ///
    /// Errors already naming a record are returned unchanged.
    pub fn for_record(self, id: TaskId) -> Self {
        match self {
            err @ TaskError::RecordWriteFailed { .. } => err,
            err => TaskError::RecordWriteFailed {
                id,
                reason: err.to_string(),
            },
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = match &self {
            TaskError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TaskError::RecordWriteFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TaskError::NotFound(_) | TaskError::UnknownPreset(_) => StatusCode::NOT_FOUND,
            TaskError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TaskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the reminder server.
pub type Result<T> = std::result::Result<T, TaskError>;
