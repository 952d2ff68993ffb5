//! Configuration modules for hostfetch.
//!
//! - [`RequestConfig`]: one tier of request configuration (re-exported from
//!   `hostfetch-core`) and [`merge_two`], the tier merge
//! - [`Interceptor`]: request/response interception

mod interceptor;

pub use hostfetch_core::{RequestConfig, merge_two};
pub use interceptor::{
    BoxFuture, ErrorHandler, HeaderInterceptor, Interceptor, Outcome, RequestInterceptor,
    ResponseInterceptor, SuccessHandler,
};
