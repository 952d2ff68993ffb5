//! Interceptors for hostfetch.
//!
//! An interceptor is a pair of handlers: a required success handler and an
//! optional error handler. Request interceptors see the [`Envelope`] before
//! dispatch; response interceptors see the [`Response`] after it.
//!
//! Handlers return an [`Outcome`]:
//!
//! - [`Outcome::Ready`] settles immediately. A ready failure from a success
//!   handler is routed to the error handler of the *same* interceptor.
//! - [`Outcome::Deferred`] settles later. A deferred failure skips this
//!   interceptor and reaches the error handler of the next one.
//!
//! # Example
//!
//! ```ignore
//! use hostfetch::{Client, ClientError, Interceptor, Outcome, RequestConfig, Response};
//!
//! let mut client = Client::create(RequestConfig::new().base_url("https://api.example.com"))?;
//!
//! // Add an auth header to every request
//! client.add_request_interceptor(Interceptor::map(|mut envelope| {
//!     envelope.headers_mut().insert("authorization", "Bearer token".parse().unwrap());
//!     Ok(envelope)
//! }));
//!
//! // Turn failed calls into an empty 503 response
//! client.add_response_interceptor(
//!     Interceptor::new(Outcome::value).on_error(|_err: ClientError| {
//!         Outcome::value(Response::new(
//!             http::StatusCode::SERVICE_UNAVAILABLE,
//!             http::HeaderMap::new(),
//!             "",
//!         ))
//!     }),
//! );
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hostfetch_core::Envelope;

use crate::{ClientError, Response};

/// Type alias for a boxed future returning a result.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a handler produced: a settled result or one still in flight.
pub enum Outcome<T> {
    /// Settled without suspending.
    Ready(Result<T, ClientError>),
    /// Settles when the future completes.
    Deferred(BoxFuture<'static, Result<T, ClientError>>),
}

impl<T> Outcome<T> {
    /// A ready value.
    pub fn value(value: T) -> Self {
        Outcome::Ready(Ok(value))
    }

    /// A ready failure.
    pub fn fail(error: ClientError) -> Self {
        Outcome::Ready(Err(error))
    }

    /// A value produced by a future.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        Outcome::Deferred(Box::pin(future))
    }

    /// Wait for the outcome to settle.
    pub async fn settle(self) -> Result<T, ClientError> {
        match self {
            Outcome::Ready(result) => result,
            Outcome::Deferred(future) => future.await,
        }
    }
}

impl<T> From<Result<T, ClientError>> for Outcome<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        Outcome::Ready(result)
    }
}

impl<T> std::fmt::Debug for Outcome<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ready(Ok(_)) => write!(f, "Outcome::Ready(Ok(..))"),
            Outcome::Ready(Err(e)) => write!(f, "Outcome::Ready(Err({:?}))", e),
            Outcome::Deferred(_) => write!(f, "Outcome::Deferred"),
        }
    }
}

/// Handler invoked with the previous stage's value.
pub type SuccessHandler<T> = Arc<dyn Fn(T) -> Outcome<T> + Send + Sync>;

/// Handler invoked with a failure from an earlier stage.
pub type ErrorHandler<T> = Arc<dyn Fn(ClientError) -> Outcome<T> + Send + Sync>;

/// A success handler and an optional error handler.
pub struct Interceptor<T> {
    success: SuccessHandler<T>,
    error: Option<ErrorHandler<T>>,
}

/// Interceptor run before dispatch.
pub type RequestInterceptor = Interceptor<Envelope>;

/// Interceptor run after dispatch.
pub type ResponseInterceptor = Interceptor<Response>;

impl<T> Clone for Interceptor<T> {
    fn clone(&self) -> Self {
        Self {
            success: self.success.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Interceptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("has_error_handler", &self.error.is_some())
            .finish()
    }
}

impl<T: Send + 'static> Interceptor<T> {
    /// Create an interceptor from a success handler.
    pub fn new<F>(success: F) -> Self
    where
        F: Fn(T) -> Outcome<T> + Send + Sync + 'static,
    {
        Self {
            success: Arc::new(success),
            error: None,
        }
    }

    /// Create an interceptor from a synchronous transformation.
    ///
    /// An `Err` counts as a ready failure and reaches this interceptor's own
    /// error handler, if one is added with [`on_error`](Self::on_error).
    pub fn map<F>(func: F) -> Self
    where
        F: Fn(T) -> Result<T, ClientError> + Send + Sync + 'static,
    {
        Self::new(move |value| Outcome::Ready(func(value)))
    }

    /// Create an interceptor from an async transformation.
    pub fn then<F, Fut>(func: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        Self::new(move |value| Outcome::deferred(func(value)))
    }

    /// Attach an error handler.
    ///
    /// Returning a value recovers: it becomes the next stage's input.
    /// Returning a failure passes it on.
    pub fn on_error<F>(mut self, error: F) -> Self
    where
        F: Fn(ClientError) -> Outcome<T> + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(error));
        self
    }

    /// Returns whether an error handler is attached.
    pub fn has_error_handler(&self) -> bool {
        self.error.is_some()
    }

    /// Run this interceptor as one stage of a chain.
    pub(crate) async fn run(&self, input: Result<T, ClientError>) -> Result<T, ClientError> {
        match input {
            Ok(value) => match (self.success)(value) {
                Outcome::Ready(Ok(value)) => Ok(value),
                Outcome::Ready(Err(err)) => self.recover(err).await,
                Outcome::Deferred(future) => future.await,
            },
            Err(err) => self.recover(err).await,
        }
    }

    async fn recover(&self, err: ClientError) -> Result<T, ClientError> {
        match &self.error {
            Some(handler) => handler(err).settle().await,
            None => Err(err),
        }
    }
}

/// A request interceptor that sets one header on every request.
///
/// # Example
///
/// ```ignore
/// use hostfetch::HeaderInterceptor;
///
/// client.add_request_interceptor(HeaderInterceptor::new("authorization", "Bearer token123"));
/// ```
#[derive(Clone, Debug)]
pub struct HeaderInterceptor {
    name: http::HeaderName,
    value: http::HeaderValue,
}

impl HeaderInterceptor {
    /// Create a new header interceptor.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.parse().expect("invalid header name"),
            value: value.parse().expect("invalid header value"),
        }
    }

    /// Try to create a new header interceptor, returning an error if invalid.
    pub fn try_new(name: &str, value: &str) -> Result<Self, ClientError> {
        let name = name
            .parse()
            .map_err(|_| ClientError::InvalidRequest(format!("invalid header name: {}", name)))?;
        let value = value
            .parse()
            .map_err(|_| ClientError::InvalidRequest(format!("invalid header value: {}", value)))?;
        Ok(Self { name, value })
    }

    /// Create a new header interceptor from pre-parsed values.
    pub fn from_parts(name: http::HeaderName, value: http::HeaderValue) -> Self {
        Self { name, value }
    }
}

impl From<HeaderInterceptor> for RequestInterceptor {
    fn from(header: HeaderInterceptor) -> Self {
        Interceptor::map(move |mut envelope: Envelope| {
            envelope
                .headers_mut()
                .insert(header.name.clone(), header.value.clone());
            Ok(envelope)
        })
    }
}
