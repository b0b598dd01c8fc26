//! Error types for the lost-found API client.
//!
//! # Design
//! Failures are classified at the HTTP boundary so callers can branch on
//! the kind (not found, unauthorized, validation). The screens only ever
//! show a message; `display_message` is that rendering, and it is what
//! `AsyncResult::Error` carries.

use thiserror::Error;

/// Errors returned by `LostFoundClient` parse methods and by transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The server rejected the input (400/422, or a `success: false`
    /// envelope, in which case `status` is the 2xx it arrived with).
    /// `field` names the offending form field when the server reports one.
    #[error("{message}")]
    Validation {
        status: u16,
        field: Option<String>,
        message: String,
    },

    /// 404: the posting (or endpoint) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// 401/403: missing or rejected credentials.
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-2xx status.
    #[error("HTTP {status}: {message}")]
    Unknown { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Collapse to the single string shown to the user.
    pub fn display_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status the error came from. `None` when no response was
    /// received or its body could not be read.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::Validation { status, .. }
            | ApiError::Unauthorized { status, .. }
            | ApiError::Unknown { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Deserialization(_) | ApiError::Serialization(_) => None,
        }
    }
}
