//! Rejection reasons produced by the sanitizer.
//!
//! Every rejection is terminal for the report: nothing is persisted and the
//! endpoint answers with a single client-error status regardless of the
//! variant. The variant only matters for internal diagnostics.
//!
//! | Reason | Cause |
//! |--------|-------|
//! | [`MissingEnvelope`](RejectionReason::MissingEnvelope) | Body is not an object with a `csp-report` object inside |
//! | [`MissingRequiredField`](RejectionReason::MissingRequiredField) | A required field is absent after projection and migration |
use thiserror::Error;

/// Why a parsed report was not accepted.
///
/// # Examples
///
/// ```rust
/// use report::RejectionReason;
///
/// let err = RejectionReason::MissingRequiredField("document-uri");
/// assert_eq!(err.to_string(), "missing required report field: document-uri");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The input is not a JSON object, has no `csp-report` key, or the value
    /// under `csp-report` is not itself an object.
    #[error("missing csp-report envelope")]
    MissingEnvelope,

    /// The named required field did not survive sanitization.
    ///
    /// When several are missing, the first in
    /// [`REQUIRED_FIELDS`](crate::REQUIRED_FIELDS) order is reported.
    #[error("missing required report field: {0}")]
    MissingRequiredField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_message() {
        assert_eq!(
            RejectionReason::MissingEnvelope.to_string(),
            "missing csp-report envelope"
        );
    }

    #[test]
    fn reasons_compare_by_field() {
        assert_eq!(
            RejectionReason::MissingRequiredField("blocked-uri"),
            RejectionReason::MissingRequiredField("blocked-uri")
        );
        assert_ne!(
            RejectionReason::MissingRequiredField("blocked-uri"),
            RejectionReason::MissingRequiredField("document-uri")
        );
    }
}
