//! # Gateway Errors
//!
//! The wire error shape and the typed errors handlers map onto it.
//! Internal failures are logged in full server-side; the wire only ever
//! carries a generic message for them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use df_02_submission_entity::EntityError;
use df_03_raw_ingestion::IngestError;
use df_05_processing_coordinator::CoordinatorError;
use serde::{Deserialize, Serialize};
use shared_types::SubmissionId;
use std::fmt;
use tracing::error;

/// Structured error body returned on every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code, duplicated in the body.
    pub status_code: u16,
    /// Human-readable message.
    pub message: String,
    /// Request path the error occurred on.
    pub path: String,
}

/// Error classes the gateway surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiErrorKind {
    NotFound,
    Conflict,
    MalformedInput,
    Internal,
}

/// A request-scoped API error: taxonomy class, message, and the path it
/// happened on (filled by the handler).
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    path: String,
    /// Full internal detail, logged but never sent on the wire.
    detail: Option<String>,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: String::new(),
            detail: None,
        }
    }

    /// Unknown institution.
    pub fn institution_not_found(institution_id: &str) -> Self {
        Self::new(
            ApiErrorKind::NotFound,
            format!("institution {} not found", institution_id),
        )
    }

    /// Unknown filing period for a known institution.
    pub fn filing_not_found(institution_id: &str, period: &str) -> Self {
        Self::new(
            ApiErrorKind::NotFound,
            format!("filing {} not found for institution {}", period, institution_id),
        )
    }

    /// Unknown submission.
    pub fn submission_not_found(id: &SubmissionId) -> Self {
        Self::new(
            ApiErrorKind::NotFound,
            format!("submission {} not found", id),
        )
    }

    /// Upload conflict: the submission already left its initial state.
    pub fn submission_conflict(id: &SubmissionId) -> Self {
        Self::new(
            ApiErrorKind::Conflict,
            format!(
                "submission {} already has an upload; create a new submission",
                id
            ),
        )
    }

    /// Wrong extension, missing field, or unparseable upload content.
    pub fn invalid_file(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::MalformedInput, message)
    }

    /// Unexpected internal failure. `detail` is logged, never exposed.
    pub fn internal(detail: impl fmt::Display) -> Self {
        let mut e = Self::new(ApiErrorKind::Internal, "internal server error");
        e.detail = Some(detail.to_string());
        e
    }

    /// Attach the request path for the wire body.
    #[must_use]
    pub fn at(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// HTTP status for this error class.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::NotFound => StatusCode::NOT_FOUND,
            ApiErrorKind::Conflict | ApiErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
            ApiErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(detail) = &self.detail {
            error!(
                subsystem = "df-06",
                path = %self.path,
                detail,
                "Request failed internally"
            );
        }
        let status = self.status();
        let body = ErrorResponse {
            status_code: status.as_u16(),
            message: self.message,
            path: self.path,
        };
        (status, Json(body)).into_response()
    }
}

/// Map an entity failure from the request path onto the wire taxonomy.
impl From<EntityError> for ApiError {
    fn from(e: EntityError) -> Self {
        match e {
            EntityError::UploadNotAllowed { .. } | EntityError::AlreadyExists => {
                Self::new(ApiErrorKind::Conflict, e.to_string())
            }
            EntityError::NotCreated => {
                Self::new(ApiErrorKind::NotFound, "submission not found")
            }
            other => Self::internal(other),
        }
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(e: CoordinatorError) -> Self {
        match e {
            CoordinatorError::NotFound { id } => Self::submission_not_found(&id),
            CoordinatorError::UploadNotAllowed { id, .. } => Self::submission_conflict(&id),
            CoordinatorError::Entity(inner) => inner.into(),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::InvalidFormat(_) | IngestError::Source { .. } => {
                Self::invalid_file("file format not supported")
            }
            IngestError::Entity(inner) => inner.into(),
        }
    }
}

/// Gateway-level errors (startup, not wire).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error.
    #[error("server bind error: {0}")]
    Bind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = ApiError::institution_not_found("XYZ999");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.message.contains("XYZ999"));
    }

    #[test]
    fn test_conflict_is_400() {
        let err = ApiError::submission_conflict(&SubmissionId::new("ABC123", "2019", 1));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = ApiError::internal("db exploded at 0x1234");
        assert_eq!(err.message, "internal server error");
        assert_eq!(err.detail.as_deref(), Some("db exploded at 0x1234"));
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let body = ErrorResponse {
            status_code: 404,
            message: "institution XYZ not found".to_string(),
            path: "/institutions/XYZ".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"statusCode\":404"));
        assert!(json.contains("\"path\""));
    }

    #[test]
    fn test_ingest_error_maps_to_invalid_format() {
        let err: ApiError = IngestError::Source {
            message: "reset".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("file format"));
    }
}
