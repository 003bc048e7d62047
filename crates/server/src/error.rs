use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use logger::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Body unparsable, envelope missing or a required field absent.
    #[error("Report rejected: {0}")]
    Rejected(#[from] PipelineError),

    /// The accepted report could not be appended to the log.
    #[error("Report log write failed: {0}")]
    SinkWrite(#[source] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::SinkWrite(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Rejected(_) => "REPORT_REJECTED",
            ServerError::SinkWrite(_) => "SINK_WRITE_FAILED",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message sent to the client. Rejection causes stay in the server log.
    fn public_message(&self) -> &'static str {
        match self {
            ServerError::Rejected(_) => "CSP report rejected",
            ServerError::SinkWrite(_) => "CSP report could not be stored",
            ServerError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(format!("JSON serialization error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logger::RejectionReason;

    #[test]
    fn every_rejection_maps_to_422() {
        let malformed = serde_json::from_slice::<serde_json::Value>(b"nope").unwrap_err();
        let errors = [
            ServerError::from(PipelineError::MalformedInput(malformed)),
            ServerError::from(PipelineError::Rejected(RejectionReason::MissingEnvelope)),
            ServerError::from(PipelineError::Rejected(
                RejectionReason::MissingRequiredField("blocked-uri"),
            )),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(err.error_code(), "REPORT_REJECTED");
            assert_eq!(err.public_message(), "CSP report rejected");
        }
    }

    #[test]
    fn sink_failure_maps_to_500() {
        let err = ServerError::SinkWrite(std::io::Error::other("disk full"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "SINK_WRITE_FAILED");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn serialization_failure_is_internal() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ServerError::from(cause);
        assert!(matches!(err, ServerError::Internal(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.public_message(), "Internal server error");
    }
}
