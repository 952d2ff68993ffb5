//! HTTP client implementation.
//!
//! This module provides the main [`Client`] type for making requests.

use std::sync::Arc;

use hostfetch_core::{Envelope, RequestConfig, merge_two};
use http::Method;
#[cfg(feature = "tracing")]
use tracing::{Instrument, info_span};

use crate::builder::{ClientBuildError, ClientBuilder};
use crate::chain::Chain;
use crate::config::{RequestInterceptor, ResponseInterceptor};
use crate::dispatch::Dispatch;
use crate::transport::{HyperTransport, Transport};
use crate::{ClientError, Response};

/// HTTP client with layered configuration and interceptors.
///
/// A client owns an instance [`RequestConfig`] (fixed at creation), a
/// [`Transport`] and two ordered interceptor lists. Every call builds a fresh
/// chain from a snapshot of those lists:
///
/// ```text
/// request interceptors -> dispatch -> response interceptors
/// ```
///
/// Cloning is cheap. A clone shares the configuration and transport but has
/// its own interceptor lists from that point on.
///
/// # Runtime
///
/// Calls must run inside a tokio runtime: the request timer is a spawned
/// tokio task, so a call with a timeout panics when polled by another
/// executor.
///
/// # Example
///
/// ```ignore
/// use hostfetch::{Client, RequestConfig};
/// use std::time::Duration;
///
/// let client = Client::create(
///     RequestConfig::new()
///         .base_url("https://api.example.com")
///         .timeout(Duration::from_secs(5)),
/// )?;
///
/// let response = client.get("/users/1").await?;
/// println!("{}", response.text()?);
/// ```
#[derive(Clone)]
pub struct Client {
    /// Instance configuration, already merged over the built-in defaults.
    config: Arc<RequestConfig>,
    /// Host request primitive.
    transport: Arc<dyn Transport>,
    request_interceptors: Vec<RequestInterceptor>,
    response_interceptors: Vec<ResponseInterceptor>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client backed by the default [`HyperTransport`].
    ///
    /// `config` is merged over [`RequestConfig::defaults`]. Fields are not
    /// validated here; a malformed base URL only surfaces when a request is
    /// attempted.
    ///
    /// # Errors
    ///
    /// Fails only when the default transport cannot be built (no TLS
    /// provider available).
    pub fn create(config: RequestConfig) -> Result<Self, ClientBuildError> {
        let transport =
            HyperTransport::new().map_err(|e| ClientBuildError::Transport(e.to_string()))?;
        Ok(Self::create_with_transport(config, transport))
    }

    /// Create a client that issues requests through `transport`.
    pub fn create_with_transport(config: RequestConfig, transport: impl Transport) -> Self {
        Self::from_parts(
            merge_two(&RequestConfig::defaults(), &config),
            Arc::new(transport),
            Vec::new(),
            Vec::new(),
        )
    }

    /// Create a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_parts(
        config: RequestConfig,
        transport: Arc<dyn Transport>,
        request_interceptors: Vec<RequestInterceptor>,
        response_interceptors: Vec<ResponseInterceptor>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            request_interceptors,
            response_interceptors,
        }
    }

    /// The instance configuration.
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// The configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    /// Merge the instance configuration with a per-call configuration.
    ///
    /// Neither input is modified.
    pub fn merge_with_instance(&self, request: &RequestConfig) -> RequestConfig {
        merge_two(&self.config, request)
    }

    /// Append a request interceptor. It runs after those already registered.
    pub fn add_request_interceptor(&mut self, interceptor: impl Into<RequestInterceptor>) {
        self.request_interceptors.push(interceptor.into());
    }

    /// Append a response interceptor. It runs after those already registered.
    pub fn add_response_interceptor(&mut self, interceptor: impl Into<ResponseInterceptor>) {
        self.response_interceptors.push(interceptor.into());
    }

    /// Send a GET request.
    pub async fn get(&self, endpoint: &str) -> Result<Response, ClientError> {
        self.get_with_config(endpoint, RequestConfig::new()).await
    }

    /// Send a GET request with per-call configuration.
    pub async fn get_with_config(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.request(Method::GET, endpoint, config).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, endpoint: &str) -> Result<Response, ClientError> {
        self.post_with_config(endpoint, RequestConfig::new()).await
    }

    /// Send a POST request. The body is taken from `config`.
    pub async fn post_with_config(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.request(Method::POST, endpoint, config).await
    }

    /// Send a PUT request without a body.
    pub async fn put(&self, endpoint: &str) -> Result<Response, ClientError> {
        self.put_with_config(endpoint, RequestConfig::new()).await
    }

    /// Send a PUT request. The body is taken from `config`.
    pub async fn put_with_config(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.request(Method::PUT, endpoint, config).await
    }

    /// Send a PATCH request without a body.
    pub async fn patch(&self, endpoint: &str) -> Result<Response, ClientError> {
        self.patch_with_config(endpoint, RequestConfig::new()).await
    }

    /// Send a PATCH request. The body is taken from `config`.
    pub async fn patch_with_config(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.request(Method::PATCH, endpoint, config).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, endpoint: &str) -> Result<Response, ClientError> {
        self.delete_with_config(endpoint, RequestConfig::new()).await
    }

    /// Send a DELETE request with per-call configuration.
    pub async fn delete_with_config(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Response, ClientError> {
        self.request(Method::DELETE, endpoint, config).await
    }

    /// Run one request through the interceptor chain.
    ///
    /// `method` always replaces any method already set on `config`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        mut config: RequestConfig,
    ) -> Result<Response, ClientError> {
        #[cfg(feature = "tracing")]
        let span = info_span!(
            "http.request",
            http.method = %method,
            http.endpoint = %endpoint,
            otel.kind = "client",
        );

        config.method = Some(method);
        let seed = Envelope::new(endpoint, self.merge_with_instance(&config));

        let chain = Chain::new(
            self.request_interceptors.clone(),
            Dispatch::new(self.config.clone(), self.transport.clone()),
            self.response_interceptors.clone(),
        );

        let call = chain.execute(seed);
        #[cfg(feature = "tracing")]
        let call = call.instrument(span);
        call.await
    }
}
