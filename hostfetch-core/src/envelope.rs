//! The value carried through request interceptors.

use http::HeaderMap;

use crate::RequestConfig;

/// An endpoint paired with the per-call configuration for it.
///
/// Request interceptors receive an envelope and hand one on to the next
/// stage. Whatever envelope reaches the dispatch stage is what gets sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    /// Path appended to the base URL (e.g. "/users/42").
    pub endpoint: String,
    /// Per-call configuration, already merged with the instance tier.
    pub config: RequestConfig,
}

impl Envelope {
    /// Create a new envelope.
    pub fn new(endpoint: impl Into<String>, config: RequestConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            config,
        }
    }

    /// Get a mutable reference to the per-call headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.config.headers
    }

    /// Split into endpoint and configuration.
    pub fn into_parts(self) -> (String, RequestConfig) {
        (self.endpoint, self.config)
    }
}
