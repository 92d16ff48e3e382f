//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use card_core::ParseError;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::completion::CompletionError;
use crate::services::orchestrator::OrchestratorError;
use crate::services::speech::SpeechError;
use crate::services::storage::StorageError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] CompletionError),

    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrchestratorError> for ApiError {
    fn from(e: OrchestratorError) -> Self {
        match e {
            OrchestratorError::Validation(msg) => ApiError::Validation(msg),
            OrchestratorError::Config(e) => ApiError::Config(e),
            OrchestratorError::Timeout(after) => ApiError::Timeout(format!("{:?}", after)),
            OrchestratorError::Upstream(e) => ApiError::Upstream(e),
            OrchestratorError::Parse(e) => ApiError::Parse(e),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidName(_) | StorageError::UnsupportedType(_) => {
                ApiError::Validation(e.to_string())
            }
            StorageError::NotFound(name) => ApiError::NotFound(name),
            StorageError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
    /// Raw model output, for parse failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Parse(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.kind.as_str()),
            ApiError::Config(_) => (StatusCode::BAD_REQUEST, "config_error"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            ApiError::Upstream(e) => match e {
                CompletionError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
                CompletionError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
                CompletionError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
                _ => (StatusCode::BAD_GATEWAY, "upstream_failure"),
            },
            ApiError::Speech(e) => match e {
                SpeechError::UnsupportedLanguage(_)
                | SpeechError::NoTranscription(_)
                | SpeechError::EmptyText => (StatusCode::BAD_REQUEST, "speech_error"),
                _ => (StatusCode::BAD_GATEWAY, "upstream_failure"),
            },
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let raw = match &self {
            ApiError::Parse(e) => Some(e.raw.clone()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            kind,
            raw,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use card_core::ParseErrorKind;

    #[test]
    fn test_parse_error_status() {
        let error = ApiError::Parse(ParseError::new(ParseErrorKind::NoArrayFound, "text"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_config_error_status() {
        let error = ApiError::Config(ConfigError::UnknownModel("gpt-9".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_status() {
        let error = ApiError::Validation("missing field".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("book.pdf".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_statuses() {
        let response = ApiError::Upstream(CompletionError::RateLimited).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = ApiError::Upstream(CompletionError::Unauthorized("no".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::Upstream(CompletionError::Network("reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_status() {
        let error = ApiError::from(OrchestratorError::Timeout(std::time::Duration::from_secs(1)));
        assert_eq!(error.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_speech_statuses() {
        let response = ApiError::Speech(SpeechError::UnsupportedLanguage("xx".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Speech(SpeechError::Backend("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_storage_error_mapping() {
        let error = ApiError::from(StorageError::UnsupportedType("a.png".into()));
        assert!(matches!(error, ApiError::Validation(_)));

        let error = ApiError::from(StorageError::NotFound("a.pdf".into()));
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_payload_too_large_status() {
        let error = ApiError::PayloadTooLarge("length limit exceeded".to_string());
        assert_eq!(error.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unavailable_status() {
        let error = ApiError::Unavailable("datastore not configured".to_string());
        assert_eq!(error.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_display_parse() {
        let error = ApiError::Parse(ParseError::new(ParseErrorKind::NoObjectFound, ""));
        assert_eq!(error.to_string(), "Parse error: no JSON object found in completion");
    }

    #[test]
    fn test_error_display_validation() {
        let error = ApiError::Validation("unknown mode 'quiz'".to_string());
        assert_eq!(error.to_string(), "Validation error: unknown mode 'quiz'");
    }
}
