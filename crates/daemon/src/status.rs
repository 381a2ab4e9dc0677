//! Protocol status codes.
//!
//! Every RPC failure is reported as a [`Code`] plus a human-readable
//! message, serialized as the JSON error body and mirrored in the HTTP
//! status line. The set matches what the orchestrator's retry logic
//! distinguishes between.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    Ok,
    /// Missing or malformed request input; retrying the identical call
    /// cannot succeed.
    InvalidArgument,
    NotFound,
    /// An existing mount at the target does not match the request.
    AlreadyExists,
    /// The plugin is not ready to serve; the orchestrator should hold off
    /// scheduling workloads that need it.
    FailedPrecondition,
    /// Filesystem or helper-process failure; safe to retry.
    Internal,
}

impl Code {
    pub fn http_status(self) -> http::StatusCode {
        match self {
            Code::Ok => http::StatusCode::OK,
            Code::InvalidArgument => http::StatusCode::BAD_REQUEST,
            Code::NotFound => http::StatusCode::NOT_FOUND,
            Code::AlreadyExists => http::StatusCode::CONFLICT,
            Code::FailedPrecondition => http::StatusCode::PRECONDITION_FAILED,
            Code::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body carried by every non-OK response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBody {
    pub code: Code,
    pub message: String,
}

impl StatusBody {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
