//! Client error types.
//!
//! This module provides [`ClientError`], the single error type that flows
//! through the interceptor chain. Transport failures, timeouts and failures
//! raised by interceptors all travel on the same channel.

use std::time::Duration;

/// Errors produced while executing a request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request timer fired before the transport settled.
    #[error("request to {endpoint} timed out after {}ms", .timeout.as_millis())]
    Timeout { endpoint: String, timeout: Duration },

    /// The transport observed its abort signal for a reason other than the timer.
    #[error("request aborted")]
    Aborted,

    /// Transport-level failure (DNS, connection refused, reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The configuration could not be turned into a request (bad URL, header, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Failure raised by an interceptor handler.
    #[error("interceptor error: {0}")]
    Interceptor(String),

    /// Response body could not be decoded as requested.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Create an interceptor error.
    pub fn interceptor<S: Into<String>>(message: S) -> Self {
        ClientError::Interceptor(message.into())
    }

    /// Create a transport error.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        ClientError::Transport(message.into())
    }

    /// Returns whether this error was caused by the request timer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }

    /// Returns whether the transport reported an abort.
    pub fn is_aborted(&self) -> bool {
        matches!(self, ClientError::Aborted)
    }

    /// The endpoint of a timed-out request.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ClientError::Timeout { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// The configured duration of a timed-out request.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            ClientError::Timeout { timeout, .. } => Some(*timeout),
            _ => None,
        }
    }
}
