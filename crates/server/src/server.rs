//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration (health check plus the catch-all report intake)
//! - Middleware stack (request IDs, logging, timeout, body limit, CORS)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{health, report};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// `GET /health` answers liveness checks; every other request, whatever its
/// path or method, is treated as a report submission.
///
/// Middleware stack (outermost first):
/// 1. Request ID tracking
/// 2. Request logging
/// 3. Tracing spans
/// 4. CORS
/// 5. Timeout handling
/// 6. Body size limit
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(health::health_check))
        .fallback(report::receive_report)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .with_state(state)
}

/// Install the JSON tracing subscriber filtered by `log_level`.
pub fn init_tracing(config: &ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

/// Start the report logger HTTP server
///
/// Binds the configured address and serves until SIGTERM or Ctrl+C. The
/// tracing subscriber must already be installed, see [`init_tracing`].
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use server::{Cli, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load(&Cli::parse())?;
///     server::init_tracing(&config)?;
///     server::start_server(config).await
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, config).await
}

/// Serve on an already bound listener
pub async fn serve(listener: tokio::net::TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    health::mark_started();

    let state = Arc::new(ServerState::new(config.clone()));
    let app = build_router(state);

    tracing::info!(
        "Listening on {} and logging reports to {}",
        listener.local_addr()?,
        config.log_path.display()
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}KiB, CORS: {}",
        config.timeout_secs,
        config.max_body_size_kb,
        config.enable_cors
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
