//! Health check handlers for service monitoring.
//!
//! Provides liveness, readiness, and health endpoints with a database
//! connectivity check for orchestration systems and load balancers.

use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when health check was performed
    pub timestamp: DateTime<Utc>,
    /// Individual component health checks
    pub checks: HealthChecks,
    /// Service version information
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing
    Unhealthy,
}

/// Individual component health check results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Database connectivity and basic query test
    pub database: ComponentHealth,
}

/// Health status for individual components.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Component status
    pub status: ComponentStatus,
    /// Optional error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Component-level health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is healthy
    Up,
    /// Component is experiencing issues
    Down,
}

/// Health check endpoint handler.
///
/// Runs a lightweight database connectivity probe and reports structured
/// component health. Designed to be called frequently, so it avoids
/// expensive operations.
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    debug!("Performing health check");

    let timestamp = Utc::now();
    let start_time = Instant::now();

    let database = match state.storage.health_check().await {
        Ok(()) => {
            debug!("Database health check passed");
            ComponentHealth {
                status: ComponentStatus::Up,
                message: None,
                response_time_ms: elapsed_ms(start_time),
            }
        },
        Err(e) => {
            error!("Database health check failed: {}", e);
            ComponentHealth {
                status: ComponentStatus::Down,
                message: Some(format!("Database connection failed: {e}")),
                response_time_ms: elapsed_ms(start_time),
            }
        },
    };

    let (overall_status, status_code) = match database.status {
        ComponentStatus::Up => (HealthStatus::Healthy, StatusCode::OK),
        ComponentStatus::Down => (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status: overall_status,
        timestamp,
        checks: HealthChecks { database },
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response)).into_response()
}

/// Readiness check endpoint for orchestration probes.
///
/// Ready means the service can reach its database, so this delegates to
/// the health check.
#[instrument(name = "readiness_check", skip(state))]
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    health_check(State(state)).await
}

/// Liveness check endpoint for orchestration probes.
///
/// Only reports that the HTTP server is responding; no external
/// dependencies are touched.
#[instrument(name = "liveness_check")]
pub async fn liveness_check() -> Response {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "timestamp": Utc::now(),
        "service": "intake-api"
    });

    (StatusCode::OK, Json(response)).into_response()
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
