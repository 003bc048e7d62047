//! HTTP route handlers
//!
//! - `health`: liveness check
//! - `report`: CSP report intake, mounted as the router fallback so reports
//!   are accepted on any path and method

pub mod health;
pub mod report;
