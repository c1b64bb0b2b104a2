//! Signal-based HTTP request facade for Signet.
//!
//! This crate provides [`http::HttpRequest`], a request object that holds
//! the configuration for a single HTTP exchange, delegates the actual
//! network call to the underlying HTTP engine, and re-emits the engine's
//! lifecycle notifications as six discrete, subscribable signal channels:
//! `completed`, `failed`, `aborted`, `timed_out`, `state_changed` and
//! `progress_changed`.
//!
//! There is no protocol implementation here and no retry, pooling, queuing
//! or caching layer: all transport work (DNS, TLS, sockets, HTTP parsing)
//! is done by the engine; the facade is configuration plumbing plus event
//! forwarding.
//!
//! # Example
//!
//! ```ignore
//! use signet_net::http::{HttpRequest, RequestConfig, ResponseType};
//!
//! let mut request = HttpRequest::with_config(RequestConfig {
//!     url: Some("https://api.example.com/data".to_string()),
//!     response_type: Some(ResponseType::Json),
//!     ..Default::default()
//! });
//!
//! // Observe the outcome
//! request.events().completed.connect(|event| {
//!     println!("Request {:?} finished with status {}", event.id, event.status);
//! });
//! request.events().failed.connect(|event| {
//!     println!("Request {:?} failed: {}", event.id, event.error);
//! });
//!
//! // Start the exchange (returns immediately; outcome arrives via signals)
//! request.send();
//! ```
//!
//! # Lifecycle
//!
//! A request mirrors the engine's five readiness states — `Unsent`,
//! `Opened`, `HeadersReceived`, `Loading`, `Done` — through
//! [`http::RequestState`], firing `state_changed` once per transition.
//! Exactly one terminal notification (`completed`, `failed`, `aborted` or
//! `timed_out`) ends every exchange. HTTP error statuses (4xx/5xx) are
//! delivered through `completed`: the exchange itself succeeded.

mod error;
pub mod http;

pub use error::{NetworkError, Result};

// Re-export commonly used types at the crate root
pub use http::{
    AbortedEvent, CompletedEvent, FailedEvent, HttpMethod, HttpRequest, ProgressEvent,
    RequestBody, RequestConfig, RequestEvents, RequestId, RequestState, ResponseData,
    ResponseType, StateChangedEvent, TimedOutEvent, TransferProgress,
};
