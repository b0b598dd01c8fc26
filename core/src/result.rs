//! Tri-state outcome of an asynchronous API operation.

use crate::error::ApiError;

/// Outcome of one remote operation as the UI observes it.
///
/// Starts as `Loading`; ends in exactly one of `Success` or `Error`, and
/// never leaves a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncResult<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> AsyncResult<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncResult::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            AsyncResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AsyncResult::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AsyncResult<U> {
        match self {
            AsyncResult::Loading => AsyncResult::Loading,
            AsyncResult::Success(data) => AsyncResult::Success(f(data)),
            AsyncResult::Error(message) => AsyncResult::Error(message),
        }
    }
}

impl<T> From<Result<T, ApiError>> for AsyncResult<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => AsyncResult::Success(data),
            Err(err) => AsyncResult::Error(err.display_message()),
        }
    }
}
