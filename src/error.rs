use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validate::ValidationIssue;

/// Message shown when the Contest Service gives no usable detail.
pub const COMMIT_FALLBACK_MESSAGE: &str = "Failed to add problems";

/// Failures talking to the Contest Service.
#[derive(Debug, Error)]
pub enum ContestError {
    #[error("contest service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("contest service rejected the batch ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// The commit task ended before the service answered.
    #[error("commit did not complete: {0}")]
    Aborted(String),
}

impl ContestError {
    /// The single message surfaced to the administrator: the server's `detail`
    /// verbatim when it sent one, the generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ContestError::Rejected { detail: Some(detail), .. } => detail.clone(),
            _ => COMMIT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Failures of editor operations. None of them change editor state.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange { what: &'static str, index: usize, len: usize },

    #[error("a problem set must keep at least one problem")]
    LastProblem,

    #[error("a problem must keep at least one test case")]
    LastTestCase,

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' expects {expected}")]
    FieldType { field: &'static str, expected: &'static str },

    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("a commit is already in progress")]
    CommitInProgress,

    #[error("{} validation issue(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<ValidationIssue>),

    #[error("{}", .0.user_message())]
    Commit(#[from] ContestError),
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Structured error response returned by the local API on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable error description.
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationIssue>,
}

impl EditorError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            EditorError::IndexOutOfRange { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            EditorError::LastProblem | EditorError::LastTestCase => {
                (StatusCode::BAD_REQUEST, "LAST_ENTRY")
            }
            EditorError::UnknownField(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_FIELD"),
            EditorError::FieldType { .. } | EditorError::InvalidValue { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_VALUE")
            }
            EditorError::CommitInProgress => (StatusCode::CONFLICT, "COMMIT_IN_PROGRESS"),
            EditorError::Invalid(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            EditorError::Commit(_) => (StatusCode::BAD_GATEWAY, "COMMIT_FAILED"),
        }
    }
}

impl IntoResponse for EditorError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if let EditorError::Commit(e) = &self {
            tracing::error!(target: "contest", error = %e, "Commit failed");
        }
        let message = self.to_string();
        let issues = match self {
            EditorError::Invalid(issues) => issues,
            _ => Vec::new(),
        };
        (status, Json(ErrorBody { code, message, issues })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_detail() {
        let e = ContestError::Rejected { status: 404, detail: Some("Contest not found".into()) };
        assert_eq!(e.user_message(), "Contest not found");
        assert_eq!(EditorError::from(e).to_string(), "Contest not found");

        let e = ContestError::Rejected { status: 400, detail: None };
        assert_eq!(e.user_message(), COMMIT_FALLBACK_MESSAGE);

        let e = ContestError::Aborted("task panicked".into());
        assert_eq!(e.user_message(), COMMIT_FALLBACK_MESSAGE);
    }

    #[test]
    fn status_codes() {
        let resp = EditorError::CommitInProgress.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = EditorError::IndexOutOfRange { what: "problem", index: 3, len: 1 }.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = EditorError::LastTestCase.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = EditorError::Commit(ContestError::Rejected { status: 500, detail: None }).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
