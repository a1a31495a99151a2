//! Test harness for intake integration tests.
//!
//! Spawns the real axum server on an ephemeral port and provides database
//! pools for both directions tests need: a reachable PostgreSQL for
//! happy-path tests and a deliberately unreachable one for the generic
//! failure path.

pub mod database;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use intake_api::AppState;
use intake_core::Storage;
use tracing_subscriber::EnvFilter;

pub use database::{lock_test_database, setup_test_database, unreachable_pool};

/// A running intake server bound to an ephemeral loopback port.
pub struct TestServer {
    /// Address the server is listening on.
    pub addr: SocketAddr,
    /// HTTP client for driving the server.
    pub client: reqwest::Client,
}

impl TestServer {
    /// Spawns the full router over the given storage.
    ///
    /// The server task runs until the test process exits; tests are
    /// short-lived so no explicit shutdown is wired up.
    pub async fn spawn(storage: Storage) -> Result<Self> {
        init_test_tracing();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr().context("Failed to get local addr")?;

        let app = intake_api::create_router(AppState { storage });
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Test server failed");
            }
        });

        Ok(Self { addr, client: reqwest::Client::new() })
    }

    /// Builds a full URL for the given path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Initializes tracing for tests, quietly ignoring repeat calls.
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,intake=debug")),
        )
        .with_test_writer()
        .try_init();
}
