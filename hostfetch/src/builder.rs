//! Client builder.
//!
//! Provides a fluent API for configuring and building a [`Client`].

use std::sync::Arc;
use std::time::Duration;

use hostfetch_core::{RequestConfig, merge_two};
use http::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::client::Client;
use crate::config::{RequestInterceptor, ResponseInterceptor};
use crate::transport::{HyperTransport, Transport};

/// Builder for creating a [`Client`].
///
/// The builder collects one instance-tier [`RequestConfig`]. [`build`]
/// merges it over [`RequestConfig::defaults`], exactly like
/// [`Client::create`].
///
/// # Example
///
/// ```ignore
/// use hostfetch::{ClientBuilder, HeaderInterceptor};
/// use std::time::Duration;
///
/// let client = ClientBuilder::new()
///     .base_url("https://api.example.com")
///     .timeout(Duration::from_secs(10))
///     .header("x-client", "hostfetch")
///     .with_request_interceptor(HeaderInterceptor::new("authorization", "Bearer token"))
///     .build()?;
/// ```
///
/// [`build`]: Self::build
#[derive(Default)]
pub struct ClientBuilder {
    /// Instance configuration collected so far.
    config: RequestConfig,
    /// Transport to use instead of the default [`HyperTransport`].
    transport: Option<Arc<dyn Transport>>,
    request_interceptors: Vec<RequestInterceptor>,
    response_interceptors: Vec<ResponseInterceptor>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("transport", &self.transport.is_some())
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder with an empty instance configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix joined with every endpoint.
    ///
    /// The endpoint is appended as-is, so include or omit the trailing slash
    /// to match the endpoints you call.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the default timeout for every call.
    ///
    /// Individual calls can override it with [`RequestConfig::timeout`]. A zero
    /// duration disables the timer.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every call.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        K::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        V::Error: std::fmt::Debug,
    {
        self.config = self.config.header(name, value);
        self
    }

    /// Add a pass-through option handed to the transport on every call.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config = self.config.option(key, value);
        self
    }

    /// Merge a whole configuration tier over what has been collected so far.
    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = merge_two(&self.config, &config);
        self
    }

    /// Use a custom host request primitive.
    ///
    /// Without this, [`build`](Self::build) creates a [`HyperTransport`] with
    /// default settings.
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Append a request interceptor.
    ///
    /// Interceptors run in the order they are added.
    pub fn with_request_interceptor(mut self, interceptor: impl Into<RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor.into());
        self
    }

    /// Append a response interceptor.
    ///
    /// Interceptors run in the order they are added.
    pub fn with_response_interceptor(
        mut self,
        interceptor: impl Into<ResponseInterceptor>,
    ) -> Self {
        self.response_interceptors.push(interceptor.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport was supplied and the default
    /// [`HyperTransport`] cannot be created.
    pub fn build(self) -> Result<Client, ClientBuildError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HyperTransport::new().map_err(|e| ClientBuildError::Transport(e.to_string()))?,
            ),
        };

        Ok(Client::from_parts(
            merge_two(&RequestConfig::defaults(), &self.config),
            transport,
            self.request_interceptors,
            self.response_interceptors,
        ))
    }
}

/// Error type for client building failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// Failed to create the default transport.
    #[error("failed to create HTTP transport: {0}")]
    Transport(String),
}
