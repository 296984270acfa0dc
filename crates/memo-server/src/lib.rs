//! # Memo Server
//!
//! HTTP transport for the memo service: routes under `/api/memo`, session
//! resolution, request validation, the response envelope and configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// TOML configuration
pub mod config;

/// Request payload parsing and validation
pub mod dto;

/// Response envelope and error mapping
pub mod response;

/// Routes and shared state
pub mod routes;

/// Session resolution
pub mod session;

use axum::Router;
use memo_store::MemoryMemoStore;
use std::sync::Arc;

pub use config::{ConfigError, ServerConfig};
pub use routes::{router, AppState};
pub use session::{SessionResolver, StaticSessions};

/// Build the application router over an in-memory store
pub fn build_app(config: &ServerConfig) -> Router {
    let sessions = StaticSessions::new(config.session_cookie.clone(), config.sessions.clone());
    let state = AppState::new(MemoryMemoStore::new(), Arc::new(sessions), config);
    router(state, routes::cors_layer(&config.cors_origins))
}
