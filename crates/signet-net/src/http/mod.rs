//! HTTP request facade for Signet.
//!
//! This module provides [`HttpRequest`]: configuration plumbing around one
//! engine-backed transport handle, plus six notification channels that
//! re-emit the transport's lifecycle callbacks.
//!
//! # Example
//!
//! ```ignore
//! use signet_net::http::{HttpRequest, ResponseType};
//!
//! let mut request = HttpRequest::new();
//! request.set_url("https://api.example.com/users");
//! request.set_response_type(ResponseType::Json);
//!
//! request.events().state_changed.connect(|event| {
//!     println!("request {:?} is now {}", event.id, event.state);
//! });
//! request.events().completed.connect(|event| {
//!     println!("HTTP {} with body {:?}", event.status, event.response);
//! });
//!
//! request.send();
//! ```
//!
//! # Cancellation
//!
//! ```ignore
//! request.send();
//! // ... later, from any thread:
//! request.abort(); // the `aborted` channel fires from the transport side
//! ```

mod events;
mod request;
mod response;
pub mod runtime;
mod state;
mod transport;

pub use events::{
    AbortedEvent, CompletedEvent, FailedEvent, ProgressEvent, RequestEvents, RequestId,
    StateChangedEvent, TimedOutEvent,
};
pub use request::{HttpMethod, HttpRequest, RequestBody, RequestConfig};
pub use response::{ResponseData, ResponseType, TransferProgress};
pub use state::RequestState;
