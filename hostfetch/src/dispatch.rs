//! The network stage of the chain.
//!
//! Dispatch performs exactly one transport call:
//!
//! 1. A fresh [`AbortController`] is created for the call.
//! 2. If a timeout applies, a [`Timer`] aborts the controller when it elapses.
//! 3. The instance configuration is merged with the per-call configuration a
//!    second time, so edits made by request interceptors are honoured.
//! 4. The request is issued against `base_url + endpoint`.
//! 5. An abort caused by the timer becomes [`ClientError::Timeout`]; every
//!    other outcome is returned unchanged.
//!
//! The timer is cleared on every exit path, including when the call future
//! is dropped mid-flight.

use std::sync::Arc;
use std::time::Duration;

use hostfetch_core::{Envelope, RequestConfig, merge_two};
use http::Method;

use crate::timer::Timer;
use crate::transport::{HttpRequest, Transport};
use crate::{AbortController, AbortReason, AbortSignal, ClientError, Response};

#[derive(Clone)]
pub(crate) struct Dispatch {
    instance: Arc<RequestConfig>,
    transport: Arc<dyn Transport>,
}

impl Dispatch {
    pub(crate) fn new(instance: Arc<RequestConfig>, transport: Arc<dyn Transport>) -> Self {
        Self {
            instance,
            transport,
        }
    }

    pub(crate) async fn run(&self, envelope: Envelope) -> Result<Response, ClientError> {
        let (endpoint, config) = envelope.into_parts();

        let controller = AbortController::new();
        let timeout = effective_timeout(&config, &self.instance);
        let timer = timeout.map(|after| {
            let controller = controller.clone();
            Timer::schedule_after(after, move || {
                controller.abort(AbortReason::Timeout { after })
            })
        });

        let signal = controller.signal();
        let request = build_request(
            &endpoint,
            merge_two(&self.instance, &config),
            signal.clone(),
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            timeout = ?timeout,
            "dispatching request"
        );

        let result = tokio::select! {
            result = self.transport.issue(request) => result,
            _ = signal.aborted() => Err(ClientError::Aborted),
        };

        if let Some(timer) = timer {
            timer.cancel();
        }

        match (result, signal.reason()) {
            (Err(ClientError::Aborted), Some(AbortReason::Timeout { after })) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    endpoint = %endpoint,
                    timeout_ms = after.as_millis() as u64,
                    "request timed out"
                );
                Err(ClientError::Timeout {
                    endpoint,
                    timeout: after,
                })
            }
            (result, _) => result,
        }
    }
}

/// Per-call timeout, else the instance timeout. Zero disables the timer.
fn effective_timeout(call: &RequestConfig, instance: &RequestConfig) -> Option<Duration> {
    call.timeout
        .or(instance.timeout)
        .filter(|timeout| !timeout.is_zero())
}

fn build_request(endpoint: &str, effective: RequestConfig, signal: AbortSignal) -> HttpRequest {
    let RequestConfig {
        base_url,
        method,
        headers,
        body,
        options,
        ..
    } = effective;

    HttpRequest {
        method: method.unwrap_or(Method::GET),
        url: format!("{}{}", base_url.unwrap_or_default(), endpoint),
        headers,
        body: body.unwrap_or_default(),
        options,
        signal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::transport_fn;
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode};
    use std::sync::Mutex;

    fn echo_dispatch(instance: RequestConfig, seen: Arc<Mutex<Vec<HttpRequest>>>) -> Dispatch {
        let transport = transport_fn(move |request: HttpRequest| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(request);
                Ok(Response::new(StatusCode::OK, HeaderMap::new(), "done"))
            }
        });
        Dispatch::new(Arc::new(instance), Arc::new(transport))
    }

    #[test]
    fn test_effective_timeout() {
        let instance = RequestConfig::new().timeout(Duration::from_millis(100));
        let call = RequestConfig::new().timeout(Duration::from_millis(20));

        assert_eq!(
            effective_timeout(&call, &instance),
            Some(Duration::from_millis(20))
        );
        assert_eq!(
            effective_timeout(&RequestConfig::new(), &instance),
            Some(Duration::from_millis(100))
        );
        assert_eq!(
            effective_timeout(&RequestConfig::new().timeout(Duration::ZERO), &instance),
            None
        );
        assert_eq!(
            effective_timeout(&RequestConfig::new(), &RequestConfig::new()),
            None
        );
    }

    #[test]
    fn test_build_request_defaults() {
        let signal = AbortController::new().signal();
        let request = build_request("/ping", RequestConfig::new(), signal);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "/ping");
        assert!(request.body.is_empty());
        assert!(!request.signal.is_aborted());
    }

    #[tokio::test]
    async fn test_dispatch_merges_instance_again() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let instance = RequestConfig::new()
            .base_url("http://api.test")
            .header("x-instance", "1")
            .header("x-shared", "instance");
        let dispatch = echo_dispatch(instance, seen.clone());

        // A per-call config that never went through the first merge
        let call = RequestConfig::new()
            .method(Method::POST)
            .header("x-shared", "call")
            .body("payload");
        let response = dispatch.run(Envelope::new("/items", call)).await.unwrap();
        assert_eq!(response.text().unwrap(), "done");

        let seen = seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://api.test/items");
        assert_eq!(request.headers["x-instance"], "1");
        assert_eq!(request.headers["x-shared"], "call");
        assert_eq!(request.body, Bytes::from("payload"));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let transport = transport_fn(|_req: HttpRequest| async {
            Err::<Response, _>(ClientError::transport("refused"))
        });
        let dispatch = Dispatch::new(
            Arc::new(RequestConfig::new().timeout(Duration::from_secs(5))),
            Arc::new(transport),
        );

        let err = dispatch
            .run(Envelope::new("/", RequestConfig::new()))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::transport("refused"));
    }

    #[tokio::test]
    async fn test_abort_without_timer_is_not_a_timeout() {
        let transport =
            transport_fn(|_req: HttpRequest| async { Err::<Response, _>(ClientError::Aborted) });
        let dispatch = Dispatch::new(Arc::new(RequestConfig::new()), Arc::new(transport));

        let err = dispatch
            .run(Envelope::new("/", RequestConfig::new()))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Aborted);
    }

    #[tokio::test]
    async fn test_timer_turns_hang_into_timeout() {
        let transport = transport_fn(|_req: HttpRequest| {
            futures::future::pending::<Result<Response, ClientError>>()
        });
        let dispatch = Dispatch::new(Arc::new(RequestConfig::new()), Arc::new(transport));

        let call = RequestConfig::new().timeout(Duration::from_millis(20));
        let err = dispatch
            .run(Envelope::new("/hang", call))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Timeout {
                endpoint: "/hang".into(),
                timeout: Duration::from_millis(20),
            }
        );
    }
}
