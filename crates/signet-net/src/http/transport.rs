//! The transport handle: one HTTP engine exchange, surfaced through
//! readiness codes and low-level callbacks.
//!
//! Each [`HttpRequest`](super::HttpRequest) owns exactly one [`Transport`],
//! created at construction and never replaced. The transport delegates all
//! real network work to the HTTP engine and keeps an observable snapshot of
//! the current exchange (readiness, status, headers, accumulated body,
//! parsed response) that the facade's observation accessors read. The six
//! low-level callbacks a driven exchange raises are delivered through the
//! [`TransportObserver`] seam; the facade translates them into its
//! notification channels.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::{NetworkError, Result};
use super::request::{HttpMethod, RequestBody};
use super::response::{ResponseData, ResponseType, TransferProgress, parse_body};

/// Transport readiness codes. [`RequestState`](super::RequestState) maps
/// these onto the public enum; nothing outside this module should rely on
/// the numbering.
pub(crate) const READY_STATE_UNSENT: u8 = 0;
pub(crate) const READY_STATE_OPENED: u8 = 1;
pub(crate) const READY_STATE_HEADERS_RECEIVED: u8 = 2;
pub(crate) const READY_STATE_LOADING: u8 = 3;
pub(crate) const READY_STATE_DONE: u8 = 4;

/// The low-level callbacks an exchange raises while it is driven.
///
/// All callbacks run synchronously inside the driving task, in delivery
/// order: zero or more ready-state/progress callbacks, then exactly one of
/// load/error/abort/timeout.
pub(crate) trait TransportObserver: Send + Sync + 'static {
    /// The exchange moved to a new readiness code.
    fn on_ready_state(&self, code: u8);
    /// More of the response body arrived.
    fn on_progress(&self, progress: TransferProgress);
    /// The exchange finished with a response (any HTTP status).
    fn on_load(&self, response: ResponseData, status: u16);
    /// The exchange failed below the HTTP level.
    fn on_error(&self, error: NetworkError);
    /// The exchange was cancelled.
    fn on_abort(&self);
    /// The configured timeout elapsed.
    fn on_timeout(&self);
}

/// The staged parts of a request, snapshotted by the facade at send time.
#[derive(Clone, Debug)]
pub(crate) struct RequestParts {
    pub method: HttpMethod,
    pub url: String,
    pub headers: http::HeaderMap,
    pub body: RequestBody,
    pub mime_override: Option<String>,
}

/// Observable snapshot of the current exchange plus the transport-native
/// settings (response type, timeout) that write through immediately.
struct ExchangeState {
    ready_state: u8,
    status: u16,
    status_text: String,
    headers: http::HeaderMap,
    body: Vec<u8>,
    response: ResponseData,
    /// Effective mime for the exchange: the caller's override if set,
    /// otherwise the response Content-Type.
    mime: Option<String>,
    response_type: ResponseType,
    /// Zero disables the timeout.
    timeout: Duration,
}

impl ExchangeState {
    fn new() -> Self {
        Self {
            ready_state: READY_STATE_UNSENT,
            status: 0,
            status_text: String::new(),
            headers: http::HeaderMap::new(),
            body: Vec::new(),
            response: ResponseData::None,
            mime: None,
            response_type: ResponseType::default(),
            timeout: Duration::ZERO,
        }
    }

    /// Clear everything a previous exchange left behind, keeping the
    /// transport-native settings.
    fn reset_exchange(&mut self) {
        self.ready_state = READY_STATE_UNSENT;
        self.status = 0;
        self.status_text.clear();
        self.headers.clear();
        self.body.clear();
        self.response = ResponseData::None;
        self.mime = None;
    }
}

/// One engine-backed transport handle.
pub(crate) struct Transport {
    client: reqwest::Client,
    state: Mutex<ExchangeState>,
    cancel_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl Transport {
    pub(crate) fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP transport with default configuration"),
            state: Mutex::new(ExchangeState::new()),
            cancel_tx: Mutex::new(None),
        }
    }

    // ---------------------------------------------------------------------
    // Transport-native settings (write through immediately)
    // ---------------------------------------------------------------------

    pub(crate) fn set_response_type(&self, response_type: ResponseType) {
        self.state.lock().response_type = response_type;
    }

    pub(crate) fn response_type(&self) -> ResponseType {
        self.state.lock().response_type
    }

    pub(crate) fn set_timeout(&self, timeout: Duration) {
        self.state.lock().timeout = timeout;
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.state.lock().timeout
    }

    // ---------------------------------------------------------------------
    // Observable exchange state
    // ---------------------------------------------------------------------

    pub(crate) fn ready_state_code(&self) -> u8 {
        self.state.lock().ready_state
    }

    pub(crate) fn status(&self) -> u16 {
        self.state.lock().status
    }

    pub(crate) fn status_text(&self) -> String {
        self.state.lock().status_text.clone()
    }

    pub(crate) fn response(&self) -> ResponseData {
        self.state.lock().response.clone()
    }

    pub(crate) fn response_text(&self) -> String {
        String::from_utf8_lossy(&self.state.lock().body).into_owned()
    }

    /// The raw response header block: one `name: value` line per header
    /// value, CRLF-terminated. Empty until headers have been received.
    pub(crate) fn response_headers_raw(&self) -> String {
        let state = self.state.lock();
        let mut block = String::new();
        for (name, value) in state.headers.iter() {
            block.push_str(name.as_str());
            block.push_str(": ");
            block.push_str(&String::from_utf8_lossy(value.as_bytes()));
            block.push_str("\r\n");
        }
        block
    }

    /// A single response header; multiple values are joined with `", "`.
    pub(crate) fn response_header(&self, name: &str) -> Option<String> {
        let state = self.state.lock();
        let values: Vec<String> = state
            .headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    // ---------------------------------------------------------------------
    // Driving an exchange
    // ---------------------------------------------------------------------

    /// Request cancellation of the in-flight exchange, if any.
    ///
    /// The abort callback fires from the driving task, not from here.
    pub(crate) fn abort(&self) -> bool {
        if let Some(tx) = self.cancel_tx.lock().take() {
            tx.send(()).is_ok()
        } else {
            false
        }
    }

    /// Drive one exchange to its terminal callback.
    ///
    /// Exactly one of load/error/abort/timeout is raised on `observer`
    /// before this returns.
    #[tracing::instrument(skip_all, target = "signet_net::http", fields(url = %parts.url, method = %parts.method))]
    pub(crate) async fn dispatch(&self, parts: RequestParts, observer: &dyn TransportObserver) {
        self.state.lock().reset_exchange();

        let (tx, mut cancel_rx) = oneshot::channel();
        *self.cancel_tx.lock() = Some(tx);

        tokio::select! {
            result = self.drive(parts, observer) => {
                self.cancel_tx.lock().take();
                match result {
                    Ok(()) => {}
                    Err(NetworkError::Timeout) => {
                        tracing::debug!(target: "signet_net::http", "exchange timed out");
                        self.set_ready_state(READY_STATE_DONE, observer);
                        observer.on_timeout();
                    }
                    Err(error) => {
                        tracing::debug!(target: "signet_net::http", %error, "exchange failed");
                        self.set_ready_state(READY_STATE_DONE, observer);
                        observer.on_error(error);
                    }
                }
            }
            _ = &mut cancel_rx => {
                tracing::debug!(target: "signet_net::http", "exchange aborted");
                self.cancel_tx.lock().take();
                self.set_ready_state(READY_STATE_DONE, observer);
                observer.on_abort();
            }
        }
    }

    fn set_ready_state(&self, code: u8, observer: &dyn TransportObserver) {
        self.state.lock().ready_state = code;
        observer.on_ready_state(code);
    }

    async fn drive(&self, parts: RequestParts, observer: &dyn TransportObserver) -> Result<()> {
        self.set_ready_state(READY_STATE_OPENED, observer);

        let url = url::Url::parse(&parts.url)?;
        let timeout = self.state.lock().timeout;

        let mut builder = self.client.request(parts.method.to_reqwest(), url);
        // Every accumulated value per header name, in value insertion order.
        for (name, value) in parts.headers.iter() {
            builder = builder.header(name, value);
        }
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        match parts.body {
            RequestBody::None => {}
            RequestBody::Text(text) => {
                builder = builder.body(text);
            }
            RequestBody::Json(value) => {
                builder = builder.json(&value);
            }
            RequestBody::Form(data) => {
                builder = builder.form(&data);
            }
            RequestBody::Bytes(bytes) => {
                builder = builder.body(bytes);
            }
        }

        let mut response = builder.send().await?;

        let status = response.status();
        {
            let mut state = self.state.lock();
            state.status = status.as_u16();
            state.status_text = status.canonical_reason().unwrap_or_default().to_string();
            state.headers = response.headers().clone();
            state.mime = parts.mime_override.clone().or_else(|| {
                response
                    .headers()
                    .get(http::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned)
            });
        }
        self.set_ready_state(READY_STATE_HEADERS_RECEIVED, observer);
        self.set_ready_state(READY_STATE_LOADING, observer);

        let total_bytes = response.content_length();
        let mut bytes_received = 0u64;
        while let Some(chunk) = response.chunk().await? {
            bytes_received += chunk.len() as u64;
            self.state.lock().body.extend_from_slice(&chunk);
            observer.on_progress(TransferProgress {
                bytes_received,
                total_bytes,
            });
        }

        let parsed = {
            let mut state = self.state.lock();
            let parsed = parse_body(state.response_type, state.mime.as_deref(), &state.body);
            state.response = parsed.clone();
            parsed
        };

        tracing::debug!(target: "signet_net::http", status = status.as_u16(), bytes = bytes_received, "exchange completed");
        self.set_ready_state(READY_STATE_DONE, observer);
        observer.on_load(parsed, status.as_u16());
        Ok(())
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Transport")
            .field("ready_state", &state.ready_state)
            .field("status", &state.status)
            .field("response_type", &state.response_type)
            .field("timeout", &state.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_exchange_state() {
        let transport = Transport::new();
        assert_eq!(transport.ready_state_code(), READY_STATE_UNSENT);
        assert_eq!(transport.status(), 0);
        assert_eq!(transport.status_text(), "");
        assert!(transport.response().is_none());
        assert_eq!(transport.response_text(), "");
        assert_eq!(transport.response_headers_raw(), "");
        assert_eq!(transport.response_header("content-type"), None);
    }

    #[test]
    fn test_native_settings_write_through() {
        let transport = Transport::new();
        assert_eq!(transport.timeout(), Duration::ZERO);
        transport.set_timeout(Duration::from_millis(250));
        assert_eq!(transport.timeout(), Duration::from_millis(250));

        assert_eq!(transport.response_type(), ResponseType::Auto);
        transport.set_response_type(ResponseType::Binary);
        assert_eq!(transport.response_type(), ResponseType::Binary);
    }

    #[test]
    fn test_abort_without_exchange_is_noop() {
        let transport = Transport::new();
        assert!(!transport.abort());
    }
}
