//! Fixed field lists recognised in a CSP violation report.

/// Key of the object that wraps the actual report in the request body.
pub const ENVELOPE_KEY: &str = "csp-report";

/// Fields copied from the inner report, in the order they are projected.
///
/// Any key not listed here is dropped during sanitization.
pub const ALLOWED_FIELDS: [&str; 11] = [
    "blocked-uri",
    "column-number",
    "document-uri",
    "line-number",
    "original-policy",
    "disposition",
    "referrer",
    "status-code",
    "script-sample",
    "source-file",
    "effective-directive",
];

/// Fields a sanitized report must contain to be accepted.
pub const REQUIRED_FIELDS: [&str; 3] = ["blocked-uri", "document-uri", "effective-directive"];

/// Pre-standardization name for `effective-directive`, still sent by some
/// browsers. When present it always overrides `effective-directive`.
pub const LEGACY_DIRECTIVE_FIELD: &str = "violated-directive";

/// Target of the legacy migration.
pub(crate) const EFFECTIVE_DIRECTIVE_FIELD: &str = "effective-directive";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_are_allowed() {
        for field in REQUIRED_FIELDS {
            assert!(ALLOWED_FIELDS.contains(&field), "{field} not allow-listed");
        }
    }

    #[test]
    fn legacy_field_is_not_allowed_verbatim() {
        assert!(!ALLOWED_FIELDS.contains(&LEGACY_DIRECTIVE_FIELD));
        assert!(ALLOWED_FIELDS.contains(&EFFECTIVE_DIRECTIVE_FIELD));
    }
}
