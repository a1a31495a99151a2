//! Asset batch intake handler.
//!
//! The upstream fetch worker posts asset listings in bulk; each element of
//! the `assets` array becomes its own indexed record, all inside a single
//! transaction.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use intake_core::{Result, Storage};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::AppState;

use super::internal_error_response;

/// Request body for asset batch intake.
#[derive(Debug, Deserialize)]
pub struct StoreAssetsRequest {
    /// Arbitrary JSON values, one future record each.
    pub assets: Vec<serde_json::Value>,
}

/// Success body for asset batch intake.
#[derive(Debug, Serialize)]
pub struct StoreAssetsResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Number of records written.
    pub stored: u64,
}

/// Handles `POST /store-assets`.
///
/// The batch is all-or-nothing: any failure rolls the transaction back and
/// no rows are written. An empty `assets` array is valid and stores
/// nothing.
///
/// # Errors
///
/// A body without an `assets` array, or any database failure, collapses to
/// `500 {"error": "<message>"}`.
#[instrument(name = "store_assets", skip(state, body), fields(payload_bytes = body.len()))]
pub async fn store_assets(State(state): State<AppState>, body: Bytes) -> Response {
    match store_batch(&state.storage, &body).await {
        Ok(stored) => {
            info!(stored, "asset batch indexed");
            (StatusCode::OK, Json(StoreAssetsResponse { status: "success", stored }))
                .into_response()
        },
        Err(e) => internal_error_response(&e),
    }
}

/// Parses the batch request and writes it through the storage layer.
async fn store_batch(storage: &Storage, body: &[u8]) -> Result<u64> {
    let request: StoreAssetsRequest = serde_json::from_slice(body)?;

    storage.records.insert_many(&request.assets).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape_requires_an_assets_array() {
        assert!(serde_json::from_str::<StoreAssetsRequest>(r#"{"assets": [1, {"a": 2}]}"#).is_ok());
        assert!(serde_json::from_str::<StoreAssetsRequest>(r#"{"assets": 42}"#).is_err());
        assert!(serde_json::from_str::<StoreAssetsRequest>(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn success_body_reports_the_stored_count() {
        let body = StoreAssetsResponse { status: "success", stored: 3 };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json, serde_json::json!({"status": "success", "stored": 3}));
    }
}
