//! HTTP client wrapper with layered configuration, timeouts and interceptors.
//!
//! This crate wraps a host request primitive (any [`Transport`]) and adds:
//!
//! - Configuration merged across three tiers: built-in defaults, the client
//!   instance and each call. Headers merge key by key; every other field is
//!   replaced by the higher tier.
//! - A per-call timeout that aborts the in-flight request and reports
//!   [`ClientError::Timeout`].
//! - An interceptor chain with request-side and response-side handlers, each
//!   a success handler plus an optional error handler.
//! - `get`, `post`, `put`, `patch` and `delete` helpers.
//!
//! ## Example
//!
//! ```ignore
//! use hostfetch::{Client, RequestConfig};
//! use std::time::Duration;
//!
//! let client = Client::create(
//!     RequestConfig::new()
//!         .base_url("https://api.example.com")
//!         .timeout(Duration::from_secs(5))
//!         .header("x-app", "demo"),
//! )?;
//!
//! // Per-call config wins over the instance config, header by header
//! let response = client
//!     .post_with_config(
//!         "/users",
//!         RequestConfig::new()
//!             .header("x-request-id", "42")
//!             .body(r#"{"name":"ada"}"#),
//!     )
//!     .await?;
//!
//! if response.ok() {
//!     let user: serde_json::Value = response.json()?;
//!     println!("created {user}");
//! }
//! ```
//!
//! ## Interceptors
//!
//! Stages run in registration order: every request interceptor, then the
//! network dispatch, then every response interceptor. A stage receives the
//! previous stage's result. A failure skips success handlers until a stage
//! with an error handler recovers it.
//!
//! ```ignore
//! use hostfetch::{ClientError, HeaderInterceptor, Interceptor, Outcome, Response};
//! use http::{HeaderMap, StatusCode};
//!
//! client.add_request_interceptor(HeaderInterceptor::new("authorization", "Bearer token"));
//!
//! // Turn timeouts into an empty 504 response
//! client.add_response_interceptor(Interceptor::new(Outcome::value).on_error(
//!     |err: ClientError| {
//!         if err.is_timeout() {
//!             Outcome::value(Response::new(StatusCode::GATEWAY_TIMEOUT, HeaderMap::new(), ""))
//!         } else {
//!             Outcome::fail(err)
//!         }
//!     },
//! ));
//! ```
//!
//! ## Custom Transports
//!
//! The default [`HyperTransport`] can be replaced by anything implementing
//! [`Transport`]. [`transport_fn`] adapts an async closure, which is handy in
//! tests:
//!
//! ```ignore
//! use hostfetch::{Client, RequestConfig, Response, transport_fn};
//! use http::{HeaderMap, StatusCode};
//!
//! let client = Client::create_with_transport(
//!     RequestConfig::new(),
//!     transport_fn(|request| async move {
//!         Ok(Response::new(StatusCode::OK, HeaderMap::new(), request.url))
//!     }),
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `tls` (default): `tls-ring` + `tls-native-roots`
//! - `tls-ring` / `tls-aws-lc`: rustls crypto provider
//! - `tls-native-roots` / `tls-webpki-roots`: root certificates
//! - `tracing` (default): spans and events through the `tracing` crate

mod abort;
mod builder;
mod chain;
mod client;
pub mod config;
mod dispatch;
mod error;
mod response;
mod timer;
pub mod transport;

pub use abort::{AbortController, AbortReason, AbortSignal};
pub use builder::{ClientBuildError, ClientBuilder};
pub use client::Client;
pub use error::ClientError;
pub use response::Response;

// Re-export from config module
pub use config::{
    BoxFuture, ErrorHandler, HeaderInterceptor, Interceptor, Outcome, RequestInterceptor,
    ResponseInterceptor, SuccessHandler,
};

// Re-export transport types at the top level for convenience
pub use transport::{
    FnTransport, HttpRequest, HyperTransport, HyperTransportBuilder, TlsClientConfig, Transport,
    transport_fn,
};

// Re-export core types that users need
pub use hostfetch_core::{Envelope, RequestConfig, merge_two};

pub use bytes::Bytes;
pub use http;
