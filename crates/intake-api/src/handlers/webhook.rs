//! Webhook intake handler.
//!
//! Accepts any valid JSON value as the request body and persists its
//! canonical text form as one indexed record.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use intake_core::{RecordId, Result, Storage};
use serde::Serialize;
use tracing::{info, instrument};

use crate::AppState;

use super::internal_error_response;

/// Fixed success body for the webhook endpoint.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Always `"success"`.
    pub status: &'static str,
}

/// Handles `POST /webhook`.
///
/// Any JSON value (object, array, or scalar) is accepted; no schema is
/// enforced. On success the payload is durably committed as one indexed
/// record.
///
/// # Errors
///
/// Malformed JSON, connection failures, and statement failures all
/// collapse to `500 {"error": "<message>"}`.
#[instrument(name = "receive_webhook", skip(state, body), fields(payload_bytes = body.len()))]
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    match index_payload(&state.storage, &body).await {
        Ok(record_id) => {
            info!(%record_id, "webhook payload indexed");
            (StatusCode::OK, Json(WebhookResponse { status: "success" })).into_response()
        },
        Err(e) => internal_error_response(&e),
    }
}

/// Parses the body as JSON and writes it through the storage layer.
async fn index_payload(storage: &Storage, body: &[u8]) -> Result<RecordId> {
    let payload: serde_json::Value = serde_json::from_slice(body)?;

    storage.records.insert(&payload).await
}
