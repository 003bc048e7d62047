use crate::state::{ServerMetadata, ServerState};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: String,
    #[serde(flatten)]
    metadata: ServerMetadata,
    sink: String,
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let metadata = ServerMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime_seconds(),
    };

    Json(HealthResponse {
        status: "healthy",
        service: "csp-report-logger",
        timestamp: chrono::Utc::now().to_rfc3339(),
        metadata,
        sink: state.sink.describe(),
    })
}

/// Force the start time to be recorded at boot rather than on the first health request.
pub fn mark_started() {
    once_cell::sync::Lazy::force(&SERVER_START_TIME);
}
