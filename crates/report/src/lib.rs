//! Sanitization of browser Content-Security-Policy violation reports.
//!
//! Browsers POST violation reports as loosely-shaped JSON. This crate turns an
//! already-parsed [`serde_json::Value`] into a [`SanitizedReport`] containing
//! only the recognised report fields, or rejects it with a typed
//! [`RejectionReason`]. Nothing here performs I/O or holds state, so
//! [`sanitize`] is safe to call from any number of request handlers at once.
//!
//! # Processing
//!
//! ```text
//! serde_json::Value
//!        │
//!        ▼
//! ┌──────────────────────────────────┐
//! │ 1. Envelope: "csp-report" object │──► MissingEnvelope
//! ├──────────────────────────────────┤
//! │ 2. Project allow-listed fields   │
//! ├──────────────────────────────────┤
//! │ 3. violated-directive →          │
//! │    effective-directive           │
//! ├──────────────────────────────────┤
//! │ 4. Required fields present       │──► MissingRequiredField(name)
//! └──────────────────────────────────┘
//!        │
//!        ▼
//! SanitizedReport
//! ```
//!
//! # Example
//!
//! ```rust
//! use report::{sanitize, SanitizedRecord};
//! use serde_json::json;
//!
//! let envelope = json!({
//!     "csp-report": {
//!         "blocked-uri": "https://evil.example",
//!         "document-uri": "https://site.example/page",
//!         "violated-directive": "script-src",
//!         "extra-field": "drop-me"
//!     }
//! });
//!
//! let report = sanitize(&envelope).unwrap();
//! assert_eq!(report.get("effective-directive").unwrap(), "script-src");
//! assert!(report.get("extra-field").is_none());
//!
//! let entry = SanitizedRecord::from(report).to_log_entry().unwrap();
//! assert!(entry.ends_with("}\n"));
//! ```

mod error;
mod fields;
mod record;
mod sanitize;

pub use error::RejectionReason;
pub use fields::{ALLOWED_FIELDS, ENVELOPE_KEY, LEGACY_DIRECTIVE_FIELD, REQUIRED_FIELDS};
pub use record::{SanitizedRecord, SanitizedReport};
pub use sanitize::sanitize;
