//! Per-call cancellation.
//!
//! Every dispatch creates one [`AbortController`] and attaches its
//! [`AbortSignal`] to the outgoing [`HttpRequest`](crate::HttpRequest). The
//! request timer is the only thing that aborts a controller. Transports that
//! observe the signal report the cancellation as
//! [`ClientError::Aborted`](crate::ClientError::Aborted).

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Why a signal was aborted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum AbortReason {
    /// The request timer elapsed.
    Timeout { after: Duration },
}

/// The owning side of a cancellation handle.
#[derive(Clone, Debug, Default)]
pub struct AbortController {
    token: CancellationToken,
    reason: Arc<OnceLock<AbortReason>>,
}

impl AbortController {
    /// Create a fresh, un-aborted controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a signal observing this controller.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            token: self.token.clone(),
            reason: self.reason.clone(),
        }
    }

    /// Abort with the given reason. Only the first reason is kept.
    pub fn abort(&self, reason: AbortReason) {
        // Reason first, so anyone woken by the token can read it.
        let _ = self.reason.set(reason);
        self.token.cancel();
    }
}

/// The observing side of a cancellation handle.
#[derive(Clone, Debug)]
pub struct AbortSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<AbortReason>>,
}

impl AbortSignal {
    /// Check if the controller has been aborted.
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The reason passed to [`AbortController::abort`], once aborted.
    pub fn reason(&self) -> Option<AbortReason> {
        self.reason.get().copied()
    }

    /// Resolves when the controller is aborted.
    pub async fn aborted(&self) {
        self.token.cancelled().await
    }
}
