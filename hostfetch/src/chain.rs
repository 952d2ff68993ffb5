//! Per-call interceptor chain.
//!
//! A [`Chain`] is assembled fresh for every call from snapshots of the
//! client's interceptor lists. Stages run strictly in order: request
//! interceptors, then dispatch, then response interceptors. Each stage
//! receives the previous stage's result verbatim.

use hostfetch_core::Envelope;

use crate::config::{RequestInterceptor, ResponseInterceptor};
use crate::dispatch::Dispatch;
use crate::{ClientError, Response};

pub(crate) struct Chain {
    request: Vec<RequestInterceptor>,
    dispatch: Dispatch,
    response: Vec<ResponseInterceptor>,
}

impl Chain {
    pub(crate) fn new(
        request: Vec<RequestInterceptor>,
        dispatch: Dispatch,
        response: Vec<ResponseInterceptor>,
    ) -> Self {
        Self {
            request,
            dispatch,
            response,
        }
    }

    /// Fold `seed` through every stage and return the final result.
    pub(crate) async fn execute(self, seed: Envelope) -> Result<Response, ClientError> {
        let mut envelope = Ok(seed);
        for (index, stage) in self.request.iter().enumerate() {
            envelope = stage.run(envelope).await;

            #[cfg(feature = "tracing")]
            tracing::debug!(stage = index, ok = envelope.is_ok(), "request interceptor");
            #[cfg(not(feature = "tracing"))]
            let _ = index;
        }

        // Dispatch has no error handler, so an upstream failure skips the transport
        let mut response = match envelope {
            Ok(envelope) => self.dispatch.run(envelope).await,
            Err(err) => Err(err),
        };

        for (index, stage) in self.response.iter().enumerate() {
            response = stage.run(response).await;

            #[cfg(feature = "tracing")]
            tracing::debug!(stage = index, ok = response.is_ok(), "response interceptor");
            #[cfg(not(feature = "tracing"))]
            let _ = index;
        }

        response
    }
}
