//! # Domain Error Taxonomy
//!
//! Every service operation returns [`DomainError`] so that the REST layer can
//! translate failures into consistent HTTP responses. Missing rows and rows
//! owned by somebody else collapse into the same `NotFound` category so that
//! responses never reveal whether another user's row exists.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde_json::json;

use crate::domain::models::book::BookStatus;
use crate::generator::GenerationError;

/// Failures surfaced by the domain services.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// No or invalid caller identity; always fatal to the request.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// Row missing or not owned by the caller (deliberately collapsed).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before any write happened.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A generation trigger was attempted before the wizard finished.
    #[error("book creation data is incomplete: missing {}", .missing.join(", "))]
    IncompleteCreation { missing: Vec<&'static str> },

    /// The status transition table rejected the requested move.
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition { from: BookStatus, to: BookStatus },

    /// Story generation failed; the book has already been rolled back to
    /// `creating` by the time this error surfaces.
    #[error("story generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Storage or other infrastructure failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias for service return values.
pub type DomainResult<T> = Result<T, DomainError>;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            DomainError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            DomainError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
            }
            DomainError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            DomainError::IncompleteCreation { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INCOMPLETE_CREATION_DATA",
                self.to_string(),
            ),
            DomainError::IllegalTransition { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            }
            DomainError::Generation(_) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", self.to_string())
            }
            DomainError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
