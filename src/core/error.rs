//! Typed error handling for the binder
//!
//! Every failure of a bind operation is reported as a [`BindError`]. The
//! variants map onto HTTP status codes and stable error codes so that an
//! axum handler can return the error directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use this_binder::prelude::*;
//!
//! match binder.bind::<User>(request) {
//!     Ok(user) => println!("bound {}", user.name),
//!     Err(BindError::Validation(errors)) => {
//!         for e in errors {
//!             println!("{}: {}", e.field, e.message);
//!         }
//!     }
//!     Err(e) => eprintln!("bind failed: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::content_type::BodyFormat;

/// The error type returned by every bind operation
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// The body's content type is missing or not one the binder decodes
    #[error("Unsupported media type: {}", .content_type.as_deref().unwrap_or("<none>"))]
    UnsupportedMediaType { content_type: Option<String> },

    /// The request has no body and its method does not bind from the query string
    #[error("Request body is empty for method {method}")]
    EmptyBody { method: String },

    /// The body exceeds the configured limit
    #[error("Request body exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The body could not be collected from the request
    #[error("Failed to read request body: {message}")]
    BodyRead { message: String },

    /// The decoder (or a custom unmarshal hook) rejected the input
    #[error("Failed to decode {format} input: {message}")]
    Decode { format: DecodeSource, message: String },

    /// One or more validation rules failed
    #[error("Validation errors: {}", format_field_errors(.0))]
    Validation(Vec<FieldValidationError>),

    /// The binder configuration is invalid
    #[error("Invalid binder configuration: {0}")]
    Config(String),
}

/// Where the decoded data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeSource {
    Body(BodyFormat),
    Query,
}

impl std::fmt::Display for DecodeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeSource::Body(format) => write!(f, "{}", format),
            DecodeSource::Query => write!(f, "query"),
        }
    }
}

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    /// Dotted path of the field (`address.city`, `tags[1]`)
    pub field: String,
    /// Rule code (`length`, `email`, `range`, ...)
    pub code: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BindError {
    pub(crate) fn decode(format: DecodeSource, err: impl std::fmt::Display) -> Self {
        BindError::Decode {
            format,
            message: err.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BindError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            BindError::EmptyBody { .. } => StatusCode::BAD_REQUEST,
            BindError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BindError::BodyRead { .. } => StatusCode::BAD_REQUEST,
            BindError::Decode { .. } => StatusCode::BAD_REQUEST,
            BindError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BindError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BindError::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            BindError::EmptyBody { .. } => "EMPTY_BODY",
            BindError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            BindError::BodyRead { .. } => "BODY_READ_ERROR",
            BindError::Decode { .. } => "DECODE_ERROR",
            BindError::Validation(_) => "VALIDATION_ERROR",
            BindError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BindError::Validation(errors) => Some(serde_json::json!({ "fields": errors })),
            BindError::Decode { format, .. } => {
                Some(serde_json::json!({ "source": format.to_string() }))
            }
            BindError::PayloadTooLarge { limit } => Some(serde_json::json!({ "limit": limit })),
            _ => None,
        }
    }
}

impl IntoResponse for BindError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
