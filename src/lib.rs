//! Umbrella crate for the CSP report logger.
//!
//! This crate stitches JSON parsing and report sanitization together so the
//! HTTP layer can turn a raw request body into a persistable record with a
//! single call.

pub use report::{
    ALLOWED_FIELDS, ENVELOPE_KEY, LEGACY_DIRECTIVE_FIELD, REQUIRED_FIELDS, RejectionReason,
    SanitizedRecord, SanitizedReport, sanitize,
};

use serde_json::Value;
use std::error::Error;
use std::fmt;

/// Errors that can occur while turning a request body into a record.
///
/// Every variant is a client-side failure: the report is dropped and nothing
/// is written.
#[derive(Debug)]
pub enum PipelineError {
    /// The body is not a single JSON document.
    MalformedInput(serde_json::Error),
    /// The body parsed but the sanitizer refused it.
    Rejected(RejectionReason),
}

impl PipelineError {
    /// Short machine-readable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MalformedInput(_) => "malformed_input",
            PipelineError::Rejected(RejectionReason::MissingEnvelope) => "missing_envelope",
            PipelineError::Rejected(RejectionReason::MissingRequiredField(_)) => {
                "missing_required_field"
            }
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MalformedInput(err) => write!(f, "malformed report body: {err}"),
            PipelineError::Rejected(reason) => write!(f, "report rejected: {reason}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::MalformedInput(err) => Some(err),
            PipelineError::Rejected(reason) => Some(reason),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::MalformedInput(value)
    }
}

impl From<RejectionReason> for PipelineError {
    fn from(value: RejectionReason) -> Self {
        PipelineError::Rejected(value)
    }
}

/// Parse a raw request body into a generic JSON value.
///
/// Empty bodies, invalid UTF-8 and trailing garbage all count as malformed.
pub fn parse_report(body: &[u8]) -> Result<Value, PipelineError> {
    Ok(serde_json::from_slice(body)?)
}

/// Parse and sanitize a raw request body.
///
/// ```rust
/// use csp_report_logger::{process_report, PipelineError};
///
/// let body = br#"{"csp-report": {"blocked-uri": "x", "document-uri": "y", "violated-directive": "script-src"}}"#;
/// let record = process_report(body).unwrap();
/// assert_eq!(record.report.get("effective-directive").unwrap(), "script-src");
///
/// assert!(matches!(process_report(b"not json at all"), Err(PipelineError::MalformedInput(_))));
/// ```
pub fn process_report(body: &[u8]) -> Result<SanitizedRecord, PipelineError> {
    let envelope = parse_report(body)?;
    let report = sanitize(&envelope)?;
    tracing::debug!(fields = report.len(), "report sanitized");
    Ok(SanitizedRecord::from(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_malformed() {
        let err = process_report(b"").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput(_)));
        assert_eq!(err.kind(), "malformed_input");
    }

    #[test]
    fn trailing_garbage_is_malformed() {
        let err = parse_report(br#"{"csp-report": {}} trailing"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput(_)));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = parse_report(&[b'"', 0xff, 0xfe, b'"']).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput(_)));
    }

    #[test]
    fn rejection_keeps_reason_as_source() {
        let err = process_report(br#"{"csp-report": {"blocked-uri": "x"}}"#).unwrap_err();
        assert_eq!(err.kind(), "missing_required_field");
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("missing required report field: document-uri".to_string())
        );
        assert_eq!(
            err.to_string(),
            "report rejected: missing required report field: document-uri"
        );
    }

    #[test]
    fn missing_envelope_kind() {
        let err = process_report(br#"{"not-csp-report": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Rejected(RejectionReason::MissingEnvelope)
        ));
        assert_eq!(err.kind(), "missing_envelope");
    }
}
