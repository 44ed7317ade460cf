//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Bad parameters become `400` with the per-field detail; a body that
//! could not be read keeps its rejection status (`413` when over the body
//! limit); a schema that could not be built is an internal error whose
//! cause is only logged.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqargs_core::{BadParams, SchemaError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code ("BAD_PARAMS", "PAYLOAD_TOO_LARGE",
    /// "BAD_REQUEST", "INTERNAL_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field path → message, present only for per-field failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors surfaced by validated handlers and extractors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request carried bad parameters (400).
    #[error(transparent)]
    BadParams(#[from] BadParams),

    /// The request body could not be read; carries the rejection's own
    /// status (413 for an oversized body).
    #[error("request body rejected: {0}")]
    Body(#[from] BytesRejection),

    /// The argument schema itself is broken (500). Never shown to clients.
    #[error("invalid argument schema: {0}")]
    Schema(#[from] SchemaError),
}

impl ApiError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadParams(_) => (StatusCode::BAD_REQUEST, "BAD_PARAMS"),
            Self::Body(rejection) => match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => {
                    (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
                }
                status => (status, "BAD_REQUEST"),
            },
            Self::Schema(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn body(&self) -> ErrorBody {
        let (_, code) = self.status_and_code();
        let (message, details) = match self {
            Self::BadParams(BadParams::Fields(_)) => {
                ("bad parameters".to_string(), Some(self.details()))
            }
            Self::BadParams(BadParams::Message(text)) => (text.clone(), None),
            Self::Body(rejection) => (rejection.body_text(), None),
            Self::Schema(_) => ("An internal error occurred".to_string(), None),
        };
        ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        }
    }

    fn details(&self) -> serde_json::Value {
        match self {
            Self::BadParams(err) => err.details(),
            Self::Body(_) | Self::Schema(_) => serde_json::Value::Null,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if matches!(&self, Self::Schema(_)) {
            tracing::error!(error = %self, "argument schema failed to build");
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::collections::BTreeMap;

    fn field_error() -> ApiError {
        let mut fields = BTreeMap::new();
        fields.insert("b".to_string(), "Required".to_string());
        fields.insert("ids.1".to_string(), "\"x\" is not a number".to_string());
        ApiError::BadParams(BadParams::Fields(fields))
    }

    async fn response_parts(err: ApiError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[test]
    fn bad_params_status_code() {
        let (status, code) = field_error().status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "BAD_PARAMS");
    }

    #[test]
    fn schema_status_code() {
        let err = ApiError::from(SchemaError::DuplicateField("a".into()));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn into_response_field_details() {
        let (status, body) = response_parts(field_error()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "BAD_PARAMS");
        assert_eq!(
            body.error.details,
            Some(serde_json::json!({"b": "Required", "ids.1": "\"x\" is not a number"}))
        );
    }

    #[tokio::test]
    async fn into_response_message_has_no_details() {
        let err = ApiError::from(BadParams::message("Json required"));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.message, "Json required");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_schema_error_hides_cause() {
        let err = ApiError::from(SchemaError::DuplicateField("secret_field".into()));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            !body.error.message.contains("secret_field"),
            "internal error details must not leak: {}",
            body.error.message
        );
    }

    #[test]
    fn error_body_skips_missing_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "BAD_PARAMS".to_string(),
                message: "Json required".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
