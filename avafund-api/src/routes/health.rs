//! Health check endpoint
//!
//! # Endpoint
//!
//! ```text
//! GET /health
//! ```
//!
//! # Response
//!
//! ```json
//! {
//!   "success": true,
//!   "data": {
//!     "status": "ok",
//!     "timestamp": 1760000000000,
//!     "network": "development",
//!     "version": "0.1.0",
//!     "database": "postgres: connected"
//!   }
//! }
//! ```
//!
//! Always answers 200; a store that fails its ping reports `degraded`.

use crate::{app::AppState, response::ApiResponse};
use axum::extract::State;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,

    /// Unix milliseconds
    pub timestamp: i64,

    pub network: String,

    /// Application version
    pub version: String,

    /// Store backend and whether it answered
    pub database: String,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    let backend = state.store.backend();
    let (status, database) = match state.store.ping().await {
        Ok(()) => ("ok", format!("{}: connected", backend)),
        Err(err) => {
            tracing::warn!(error = %err, backend, "Store health check failed");
            ("degraded", format!("{}: disconnected", backend))
        }
    };

    ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        network: state.config.api.network.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}
