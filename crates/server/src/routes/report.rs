use crate::error::{ServerError, ServerResult};
use crate::middleware::RequestId;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use logger::{process_report, SanitizedRecord};
use serde_json::Value;
use std::sync::Arc;

/// Accept one CSP violation report.
///
/// The body is parsed as JSON regardless of `Content-Type`; browsers send
/// `application/csp-report`, some clients plain `application/json`.
///
/// # Pipeline Stages
/// 1. **Parse**: raw bytes to a generic JSON value
/// 2. **Sanitize**: keep allow-listed fields, migrate `violated-directive`,
///    require `blocked-uri`, `document-uri` and `effective-directive`
/// 3. **Append**: write `{"csp-report": {...}}` plus newline to the log
///
/// # Responses
/// - `200` once the record is appended
/// - `422` for any parse or validation failure; nothing is written
/// - `500` when the append fails
pub async fn receive_report(
    State(state): State<Arc<ServerState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    body: Bytes,
) -> ServerResult<StatusCode> {
    let record = process_report(&body).map_err(|err| {
        tracing::warn!(
            request_id = %request_id,
            reason = err.kind(),
            error = %err,
            body_bytes = body.len(),
            "CSP report rejected"
        );
        ServerError::from(err)
    })?;

    let entry = record.to_log_entry()?;

    state.sink.append(entry.as_bytes()).await.map_err(|err| {
        tracing::error!(
            request_id = %request_id,
            sink = %state.sink.describe(),
            error = %err,
            "failed to append CSP report"
        );
        ServerError::SinkWrite(err)
    })?;

    tracing::info!(
        request_id = %request_id,
        document_uri = %field_text(&record, "document-uri"),
        effective_directive = %field_text(&record, "effective-directive"),
        "CSP report logged"
    );

    Ok(StatusCode::OK)
}

/// Report field as plain text for log lines; non-string values keep their JSON form.
fn field_text(record: &SanitizedRecord, field: &str) -> String {
    match record.report.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
