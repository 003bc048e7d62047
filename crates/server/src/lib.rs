//! CSP report logger server - HTTP intake for Content-Security-Policy reports
//!
//! Browsers POST violation reports to the URL named in a policy's
//! `report-uri` directive. This crate accepts those requests, runs each body
//! through [`logger::process_report`] and appends every accepted report to an
//! append-only log file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use clap::Parser;
//! use server::{Cli, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load(&Cli::parse())?;
//!     server::init_tracing(&config)?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /health` - Liveness check
//! - any other method and path - submit a report (`200`, `422` or `500`)

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod sink;
pub mod state;

pub use config::{Cli, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{build_router, init_tracing, serve, start_server};
pub use sink::{FileSink, ReportSink};
pub use state::ServerState;
