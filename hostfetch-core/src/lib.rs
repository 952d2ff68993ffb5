//! Core types for hostfetch.
//!
//! This crate holds the data shared by the client and any host transport:
//!
//! - [`config`]: the [`RequestConfig`] record and the three-tier merge rules
//! - [`Envelope`]: the endpoint and configuration that flow through request
//!   interceptors

pub mod config;
mod envelope;

pub use config::{RequestConfig, merge_two};
pub use envelope::Envelope;
