use serde_json::Value;

use crate::error::RejectionReason;
use crate::fields::{
    ALLOWED_FIELDS, EFFECTIVE_DIRECTIVE_FIELD, ENVELOPE_KEY, LEGACY_DIRECTIVE_FIELD,
    REQUIRED_FIELDS,
};
use crate::record::SanitizedReport;

/// Reduce a parsed request body to a [`SanitizedReport`].
///
/// The input may be any JSON value. It is accepted only when it is an object
/// whose `csp-report` entry is itself an object; from that inner object the
/// fields in [`ALLOWED_FIELDS`] are copied verbatim. A legacy
/// `violated-directive` then replaces `effective-directive` unconditionally,
/// even when both were sent. Finally every field in [`REQUIRED_FIELDS`] must
/// be present.
///
/// The function is pure: the same input always yields the same result.
///
/// # Errors
///
/// - [`RejectionReason::MissingEnvelope`] if the envelope shape is wrong.
/// - [`RejectionReason::MissingRequiredField`] naming the first absent
///   required field.
///
/// # Examples
///
/// ```rust
/// use report::{sanitize, RejectionReason};
/// use serde_json::json;
///
/// let missing_doc = json!({"csp-report": {"blocked-uri": "x", "violated-directive": "script-src"}});
/// assert_eq!(
///     sanitize(&missing_doc),
///     Err(RejectionReason::MissingRequiredField("document-uri"))
/// );
///
/// assert_eq!(sanitize(&json!({"not-csp-report": {}})), Err(RejectionReason::MissingEnvelope));
/// ```
pub fn sanitize(envelope: &Value) -> Result<SanitizedReport, RejectionReason> {
    let inner = envelope
        .get(ENVELOPE_KEY)
        .and_then(Value::as_object)
        .ok_or(RejectionReason::MissingEnvelope)?;

    let mut report = SanitizedReport::new();
    for field in ALLOWED_FIELDS {
        if let Some(value) = inner.get(field) {
            report.insert(field, value.clone());
        }
    }

    if let Some(directive) = inner.get(LEGACY_DIRECTIVE_FIELD) {
        report.insert(EFFECTIVE_DIRECTIVE_FIELD, directive.clone());
    }

    if let Some(missing) = REQUIRED_FIELDS.into_iter().find(|f| !report.contains(f)) {
        return Err(RejectionReason::MissingRequiredField(missing));
    }

    Ok(report)
}
