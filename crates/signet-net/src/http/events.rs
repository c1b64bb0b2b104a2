//! Notification channels and their payloads.
//!
//! Every [`HttpRequest`](super::HttpRequest) owns one [`RequestEvents`]
//! value: six independent signal channels, one per lifecycle notification.
//! Channels are unbuffered broadcast points — slots subscribed when a
//! notification fires are invoked synchronously, later subscribers miss it.
//! Each payload carries the [`RequestId`] of the originating request so a
//! shared subscriber can demultiplex.

use std::sync::atomic::{AtomicU64, Ordering};

use signet_core::Signal;

use crate::error::NetworkError;
use super::response::{ResponseData, TransferProgress};
use super::state::RequestState;

/// Unique identifier for a request instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Payload of the `state_changed` channel: the transport moved to a new
/// readiness state.
#[derive(Clone, Debug)]
pub struct StateChangedEvent {
    /// The request that changed state.
    pub id: RequestId,
    /// The state the transport moved to.
    pub state: RequestState,
}

/// Payload of the `progress_changed` channel: more of the response body
/// has arrived.
#[derive(Clone, Debug)]
pub struct ProgressEvent {
    /// The request making progress.
    pub id: RequestId,
    /// Byte counts for the transfer so far.
    pub progress: TransferProgress,
}

/// Payload of the `completed` channel: the exchange finished and a response
/// is available.
///
/// HTTP error statuses (4xx/5xx) arrive here too — the transport considers
/// the exchange itself successful. Check [`status`](Self::status).
#[derive(Clone, Debug)]
pub struct CompletedEvent {
    /// The request that completed.
    pub id: RequestId,
    /// The response body, parsed according to the configured response type.
    pub response: ResponseData,
    /// HTTP status code of the response.
    pub status: u16,
}

/// Payload of the `failed` channel: the exchange failed below the HTTP
/// level (DNS, connect, TLS, malformed response, ...).
#[derive(Clone, Debug)]
pub struct FailedEvent {
    /// The request that failed.
    pub id: RequestId,
    /// What the transport reported.
    pub error: NetworkError,
}

/// Payload of the `aborted` channel: the exchange was cancelled through
/// [`HttpRequest::abort`](super::HttpRequest::abort).
#[derive(Clone, Debug)]
pub struct AbortedEvent {
    /// The request that was aborted.
    pub id: RequestId,
}

/// Payload of the `timed_out` channel: the configured timeout elapsed
/// before the exchange finished.
#[derive(Clone, Debug)]
pub struct TimedOutEvent {
    /// The request that timed out.
    pub id: RequestId,
}

/// The six notification channels of a request.
///
/// Exactly one of `completed`, `failed`, `aborted` or `timed_out` fires per
/// exchange, preceded by zero or more `state_changed` and
/// `progress_changed` notifications.
pub struct RequestEvents {
    /// The exchange finished with a response (any HTTP status).
    pub completed: Signal<CompletedEvent>,
    /// The exchange failed below the HTTP level.
    pub failed: Signal<FailedEvent>,
    /// The exchange was cancelled.
    pub aborted: Signal<AbortedEvent>,
    /// The configured timeout elapsed.
    pub timed_out: Signal<TimedOutEvent>,
    /// The transport moved to a new readiness state.
    pub state_changed: Signal<StateChangedEvent>,
    /// More of the response body arrived.
    pub progress_changed: Signal<ProgressEvent>,
}

impl RequestEvents {
    pub(crate) fn new() -> Self {
        Self {
            completed: Signal::new(),
            failed: Signal::new(),
            aborted: Signal::new(),
            timed_out: Signal::new(),
            state_changed: Signal::new(),
            progress_changed: Signal::new(),
        }
    }
}

impl std::fmt::Debug for RequestEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEvents")
            .field("completed", &self.completed.connection_count())
            .field("failed", &self.failed.connection_count())
            .field("aborted", &self.aborted.connection_count())
            .field("timed_out", &self.timed_out.connection_count())
            .field("state_changed", &self.state_changed.connection_count())
            .field("progress_changed", &self.progress_changed.connection_count())
            .finish()
    }
}
