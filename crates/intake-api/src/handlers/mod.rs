//! HTTP request handlers for the intake API.
//!
//! Handlers follow one pattern: an internal operation returns
//! `Result<_, CoreError>`, and the handler converts that value into one of
//! exactly two response shapes at the boundary, a fixed success body or
//! `500` with the failure's description text. Error kinds are
//! distinguished in logs and types, never in the response.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use intake_core::CoreError;
use serde::Serialize;
use tracing::error;

pub mod assets;
pub mod health;
pub mod webhook;

pub use assets::store_assets;
pub use health::{health_check, liveness_check, readiness_check};
pub use webhook::receive_webhook;

/// Error body carrying the failure's description text.
///
/// The message content is runtime-dependent and not a stable contract;
/// only the shape (`{"error": "..."}`) is.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}

/// Converts any core failure into the generic 500 response.
fn internal_error_response(err: &CoreError) -> Response {
    error!(error = %err, "request failed");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: err.to_string() }))
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_core_error_becomes_a_500() {
        let response =
            internal_error_response(&CoreError::InvalidPayload("expected value".into()));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_serializes_to_flat_error_key() {
        let body = ErrorResponse { error: "boom".to_string() };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json, serde_json::json!({"error": "boom"}));
    }
}
