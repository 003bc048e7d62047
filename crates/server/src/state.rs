use crate::config::ServerConfig;
use crate::sink::{FileSink, ReportSink};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Destination for accepted reports (shared across requests)
    pub sink: Arc<dyn ReportSink>,
}

impl ServerState {
    /// Create state that appends to the configured log file
    pub fn new(config: ServerConfig) -> Self {
        let sink = Arc::new(FileSink::new(config.log_path.clone()));
        Self::with_sink(config, sink)
    }

    /// Create state around an existing sink
    pub fn with_sink(config: ServerConfig, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            config: Arc::new(config),
            sink,
        }
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
