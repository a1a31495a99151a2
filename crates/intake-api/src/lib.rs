//! HTTP API for the intake webhook indexing service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod server;

use intake_core::Storage;

pub use crate::{
    config::Config,
    server::{create_router, start_server},
};

/// Shared application state handed to every handler.
///
/// Constructed once at process start and passed through axum's `State`
/// extractor; there is no process-global application object.
#[derive(Clone)]
pub struct AppState {
    /// Database access layer.
    pub storage: Storage,
}
