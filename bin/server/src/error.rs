//! Domain error types for server operations.
//!
//! A validation rejection and a storage failure are deliberately distinct:
//! the first means "your input was rejected" and carries every finding, the
//! second means "the system could not complete the operation" and stays
//! opaque to the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use darkroom_workflow::ViolationSet;
use serde::Serialize;
use std::fmt;

/// Storage-layer errors.
#[derive(Debug)]
pub enum StoreError {
    /// The database operation failed.
    Database { details: String },
    /// A stored record could not be decoded back into the domain model.
    CorruptRecord { id: String, details: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database { details } => {
                write!(f, "workflow database error: {}", details)
            }
            Self::CorruptRecord { id, details } => {
                write!(f, "corrupt workflow record '{}': {}", id, details)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors surfaced by the HTTP layer.
#[derive(Debug)]
pub enum ApiError {
    /// The submitted workflow failed validation.
    Validation(ViolationSet),
    /// The requested workflow does not exist.
    NotFound { id: String },
    /// The store could not complete the operation.
    Storage,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(violations) => {
                write!(f, "validation failed with {} finding(s)", violations.len())
            }
            Self::NotFound { id } => write!(f, "workflow '{}' not found", id),
            Self::Storage => write!(f, "storage failure"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Body returned for a validation rejection.
#[derive(Debug, Serialize)]
pub struct RejectionBody {
    /// Fixed summary line.
    pub detail: &'static str,
    /// Every finding, keyed by dotted field path.
    pub errors: ViolationSet,
}

/// Body returned for non-validation failures.
#[derive(Debug, Serialize)]
struct FailureBody {
    detail: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(RejectionBody {
                    detail: "Invalid request",
                    errors: violations,
                }),
            )
                .into_response(),
            Self::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(FailureBody {
                    detail: "Workflow not found",
                }),
            )
                .into_response(),
            Self::Storage => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureBody {
                    detail: "Storage failure",
                }),
            )
                .into_response(),
        }
    }
}
