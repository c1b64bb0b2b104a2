//! The HTTP request facade.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::error::{NetworkError, Result};
use super::events::{
    AbortedEvent, CompletedEvent, FailedEvent, ProgressEvent, RequestEvents, RequestId,
    StateChangedEvent, TimedOutEvent,
};
use super::response::{ResponseData, ResponseType, TransferProgress};
use super::runtime;
use super::state::RequestState;
use super::transport::{RequestParts, Transport, TransportObserver};

/// HTTP request methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    #[default]
    Get,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
    /// HTTP PATCH method.
    Patch,
    /// HTTP HEAD method.
    Head,
    /// HTTP OPTIONS method.
    Options,
}

impl HttpMethod {
    /// Convert to reqwest method.
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Patch => write!(f, "PATCH"),
            Self::Head => write!(f, "HEAD"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}

/// The body of an HTTP request.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// Plain text body.
    Text(String),
    /// JSON body (serialized from a value).
    Json(serde_json::Value),
    /// URL-encoded form data.
    Form(HashMap<String, String>),
    /// Raw binary body.
    Bytes(Bytes),
}

impl RequestBody {
    /// Build a JSON body from a serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

/// Construction-time options for a request.
///
/// Every present option is applied through the corresponding setter; every
/// absent option keeps the field's default.
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    /// Request url.
    pub url: Option<String>,
    /// HTTP method (default GET).
    pub method: Option<HttpMethod>,
    /// Whether `send` dispatches in the background (default true).
    pub asynchronous: Option<bool>,
    /// Request body.
    pub data: Option<RequestBody>,
    /// Request headers (replaces the whole mapping).
    pub headers: Option<http::HeaderMap>,
    /// How to interpret the response body.
    pub response_type: Option<ResponseType>,
    /// Exchange timeout; zero disables it.
    pub timeout: Option<Duration>,
    /// Override for the response mime type.
    pub mime_type: Option<String>,
}

/// A single HTTP exchange with observable lifecycle.
///
/// The request holds its configuration until [`send`](Self::send), hands
/// the exchange to the HTTP engine through its one transport handle, and
/// translates the engine's lifecycle callbacks into the six notification
/// channels of [`RequestEvents`]. It adds no transition validation, no
/// retries and no error classification beyond what the engine reports: it
/// is a pure observer/relay.
///
/// A request instance is intended to drive a single exchange. Calling
/// `send` again re-opens the same transport handle and resets its
/// observable state, but subscribers from the previous exchange stay
/// connected and no ordering between overlapping exchanges is defined.
///
/// # Example
///
/// ```ignore
/// use signet_net::http::{HttpMethod, HttpRequest, RequestBody};
///
/// let mut request = HttpRequest::new();
/// request.set_url("https://api.example.com/items");
/// request.set_method(HttpMethod::Post);
/// request.set_data(RequestBody::json(&serde_json::json!({"name": "item"}))?);
/// request.set_header("Authorization", "Bearer token123");
///
/// request.events().completed.connect(|event| {
///     println!("finished: HTTP {}", event.status);
/// });
///
/// request.send();
/// ```
#[derive(Debug)]
pub struct HttpRequest {
    id: RequestId,
    url: Option<String>,
    method: HttpMethod,
    asynchronous: bool,
    data: RequestBody,
    headers: http::HeaderMap,
    mime_type: Option<String>,
    transport: Arc<Transport>,
    events: Arc<RequestEvents>,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequest {
    /// Create a request with default configuration.
    pub fn new() -> Self {
        Self {
            id: RequestId::new(),
            url: None,
            method: HttpMethod::default(),
            asynchronous: true,
            data: RequestBody::None,
            headers: http::HeaderMap::new(),
            mime_type: None,
            transport: Arc::new(Transport::new()),
            events: Arc::new(RequestEvents::new()),
        }
    }

    /// Create a request and apply the given options.
    pub fn with_config(config: RequestConfig) -> Self {
        let mut request = Self::new();
        if let Some(url) = config.url {
            request.set_url(url);
        }
        if let Some(method) = config.method {
            request.set_method(method);
        }
        if let Some(asynchronous) = config.asynchronous {
            request.set_async(asynchronous);
        }
        if let Some(data) = config.data {
            request.set_data(data);
        }
        if let Some(headers) = config.headers {
            request.set_headers(headers);
        }
        if let Some(response_type) = config.response_type {
            request.set_response_type(response_type);
        }
        if let Some(timeout) = config.timeout {
            request.set_timeout(timeout);
        }
        if let Some(mime_type) = config.mime_type {
            request.set_mime_type(mime_type);
        }
        request
    }

    /// This request's unique id, carried by every event payload.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The notification channels of this request.
    pub fn events(&self) -> &RequestEvents {
        &self.events
    }

    // ---------------------------------------------------------------------
    // Configuration accessors (staged until send)
    // ---------------------------------------------------------------------

    /// Set the request url.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    /// Get the request url.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Set the HTTP method.
    pub fn set_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    /// Get the HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Set whether `send` dispatches in the background (true, the default)
    /// or blocks until the exchange terminates.
    pub fn set_async(&mut self, asynchronous: bool) {
        self.asynchronous = asynchronous;
    }

    /// Whether `send` dispatches in the background.
    pub fn is_async(&self) -> bool {
        self.asynchronous
    }

    /// Set the request body.
    pub fn set_data(&mut self, data: RequestBody) {
        self.data = data;
    }

    /// Get the request body.
    pub fn data(&self) -> &RequestBody {
        &self.data
    }

    /// Replace the whole header mapping, discarding any accumulation done
    /// through [`set_header`](Self::set_header).
    pub fn set_headers(&mut self, headers: http::HeaderMap) {
        self.headers = headers;
    }

    /// Get the header mapping.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Add a header value.
    ///
    /// Additive, not replacing: setting the same name twice accumulates
    /// both values and both are submitted on send, in insertion order.
    /// Invalid names or values are ignored with a warning.
    pub fn set_header(
        &mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.append(name, value);
        } else {
            tracing::warn!(target: "signet_net::http", "Ignoring invalid header name or value");
        }
    }

    /// Set the mime type override, applied to the transport at send time.
    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = Some(mime_type.into());
    }

    /// Get the mime type override.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    // ---------------------------------------------------------------------
    // Transport-native settings (write through immediately)
    // ---------------------------------------------------------------------

    /// Set how the response body is interpreted.
    pub fn set_response_type(&mut self, response_type: ResponseType) {
        self.transport.set_response_type(response_type);
    }

    /// Get how the response body is interpreted.
    pub fn response_type(&self) -> ResponseType {
        self.transport.response_type()
    }

    /// Set the exchange timeout. `Duration::ZERO` (the default) disables it.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.transport.set_timeout(timeout);
    }

    /// Get the exchange timeout.
    pub fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    // ---------------------------------------------------------------------
    // Driving the exchange
    // ---------------------------------------------------------------------

    /// Start the exchange.
    ///
    /// Opens the transport with the configured method/url, applies every
    /// accumulated header value and the mime override, and transmits the
    /// configured body. There is no return value; the outcome is observed
    /// through the notification channels.
    ///
    /// With the async flag set (the default) the exchange runs on the
    /// shared background runtime and `send` returns immediately. With it
    /// cleared, `send` blocks the calling thread until the exchange
    /// terminates and the notifications fire on the calling thread — do not
    /// use that mode from async contexts.
    ///
    /// Sending with no url configured is a caller error: the transport's
    /// URL parse failure surfaces through the `failed` channel, like any
    /// other transport-level fault.
    pub fn send(&self) {
        let parts = RequestParts {
            method: self.method,
            url: self.url.clone().unwrap_or_default(),
            headers: self.headers.clone(),
            body: self.data.clone(),
            mime_override: self.mime_type.clone(),
        };
        let transport = self.transport.clone();
        let relay = EventRelay {
            id: self.id,
            events: self.events.clone(),
        };
        let exchange = async move { transport.dispatch(parts, &relay).await };
        if self.asynchronous {
            let _ = runtime::spawn(exchange);
        } else {
            runtime::block_on(exchange);
        }
    }

    /// Request cancellation of the in-flight exchange.
    ///
    /// Pure pass-through: the `aborted` notification fires from the
    /// transport's own abort path, not synchronously from this call. Does
    /// nothing when no exchange is in flight.
    pub fn abort(&self) {
        self.transport.abort();
    }

    // ---------------------------------------------------------------------
    // Observation accessors (pure reads of transport state)
    // ---------------------------------------------------------------------

    /// Current lifecycle state, mirrored from the transport.
    pub fn state(&self) -> RequestState {
        RequestState::from_transport_code(self.transport.ready_state_code())
            .unwrap_or(RequestState::Unsent)
    }

    /// HTTP status code of the response; 0 before headers are received.
    pub fn status(&self) -> u16 {
        self.transport.status()
    }

    /// HTTP status text of the response; empty before headers are received.
    pub fn status_text(&self) -> String {
        self.transport.status_text()
    }

    /// The response, parsed according to the configured response type;
    /// [`ResponseData::None`] until the exchange is done.
    pub fn response(&self) -> ResponseData {
        self.transport.response()
    }

    /// The response body received so far, decoded as UTF-8 text (lossy).
    pub fn response_text(&self) -> String {
        self.transport.response_text()
    }

    /// The raw response header block (`name: value` lines, CRLF-terminated);
    /// empty before headers are received.
    pub fn response_headers(&self) -> String {
        self.transport.response_headers_raw()
    }

    /// A single response header by name; multiple values are joined with
    /// `", "`.
    pub fn response_header(&self, name: &str) -> Option<String> {
        self.transport.response_header(name)
    }
}

/// Translates the transport's low-level callbacks into the request's
/// notification channels. Each callback fires its channel synchronously,
/// with no queueing or reordering.
struct EventRelay {
    id: RequestId,
    events: Arc<RequestEvents>,
}

impl TransportObserver for EventRelay {
    fn on_ready_state(&self, code: u8) {
        let Some(state) = RequestState::from_transport_code(code) else {
            tracing::warn!(target: "signet_net::http", code, "transport reported an unknown readiness code");
            return;
        };
        self.events.state_changed.emit(StateChangedEvent {
            id: self.id,
            state,
        });
    }

    fn on_progress(&self, progress: TransferProgress) {
        self.events.progress_changed.emit(ProgressEvent {
            id: self.id,
            progress,
        });
    }

    fn on_load(&self, response: ResponseData, status: u16) {
        self.events.completed.emit(CompletedEvent {
            id: self.id,
            response,
            status,
        });
    }

    fn on_error(&self, error: NetworkError) {
        self.events.failed.emit(FailedEvent { id: self.id, error });
    }

    fn on_abort(&self) {
        self.events.aborted.emit(AbortedEvent { id: self.id });
    }

    fn on_timeout(&self) {
        self.events.timed_out.emit(TimedOutEvent { id: self.id });
    }
}
