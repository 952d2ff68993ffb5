//! The host request primitive.
//!
//! The client never performs I/O itself. It builds an [`HttpRequest`] and
//! hands it to a [`Transport`], which performs exactly one exchange and
//! returns a [`Response`]. Transports must honour the request's
//! [`AbortSignal`] and report cancellation as [`ClientError::Aborted`].
//!
//! Two implementations ship with the crate:
//!
//! - [`HyperTransport`]: hyper_util's legacy client with rustls
//! - [`FnTransport`]: any async closure, via [`transport_fn`]
//!
//! # Feature Flags
//!
//! TLS support for [`HyperTransport`] requires enabling the appropriate features:
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots` for convenience
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates
//!
//! # Example
//!
//! ```ignore
//! use hostfetch::{Response, transport_fn};
//! use http::{HeaderMap, StatusCode};
//!
//! let stub = transport_fn(|request| async move {
//!     Ok(Response::new(StatusCode::OK, HeaderMap::new(), request.url))
//! });
//! ```

mod connector;
mod hyper;

use std::collections::BTreeMap;
use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::Value;

use crate::config::BoxFuture;
use crate::{AbortSignal, ClientError, Response};

pub use connector::{build_https_connector, has_tls_support};

#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
pub use connector::default_tls_config;

pub use hyper::{HyperTransport, HyperTransportBuilder};

// Re-export rustls types that users might need for TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;

/// A request ready to be issued by a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Base URL and endpoint, concatenated.
    pub url: String,
    pub headers: HeaderMap,
    /// Request body, empty when none was configured.
    pub body: Bytes,
    /// Pass-through options from the effective configuration.
    pub options: BTreeMap<String, Value>,
    /// Fires when the request timer elapses.
    pub signal: AbortSignal,
}

/// A host capability that performs one HTTP exchange.
pub trait Transport: Send + Sync + 'static {
    /// Issue `request` and resolve with the received response.
    fn issue(&self, request: HttpRequest) -> BoxFuture<'static, Result<Response, ClientError>>;
}

/// A [`Transport`] backed by an async closure. Created by [`transport_fn`].
#[derive(Clone)]
pub struct FnTransport<F> {
    func: F,
}

impl<F> std::fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTransport").finish()
    }
}

/// Adapt an async closure into a [`Transport`].
pub fn transport_fn<F, Fut>(func: F) -> FnTransport<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, ClientError>> + Send + 'static,
{
    FnTransport { func }
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, ClientError>> + Send + 'static,
{
    fn issue(&self, request: HttpRequest) -> BoxFuture<'static, Result<Response, ClientError>> {
        Box::pin((self.func)(request))
    }
}
