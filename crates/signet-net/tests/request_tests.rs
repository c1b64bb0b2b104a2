//! Integration tests for the HTTP request facade.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use signet_net::http::{HttpRequest, RequestState};
use signet_net::NetworkError;

#[test]
fn test_missing_url_surfaces_through_failed() {
    let request = HttpRequest::new();

    let failed = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(Vec::new()));

    let failed_clone = failed.clone();
    request.events().failed.connect(move |event| {
        failed_clone.lock().push(event.clone());
    });
    let completed_clone = completed.clone();
    request.events().completed.connect(move |event| {
        completed_clone.lock().push(event.clone());
    });

    request.send();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while failed.lock().is_empty() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(25));
    }

    let failed = failed.lock();
    assert_eq!(failed.len(), 1, "exactly one failed notification");
    assert!(matches!(failed[0].error, NetworkError::InvalidUrl(_)));
    assert!(completed.lock().is_empty());
    assert_eq!(request.state(), RequestState::Done);
}

#[test]
fn test_event_payloads_carry_request_id() {
    let request = HttpRequest::new();
    let other = HttpRequest::new();
    assert_ne!(request.id(), other.id());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    request.events().failed.connect(move |event| {
        seen_clone.lock().push(event.id);
    });

    request.send(); // no url -> failed

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while seen.lock().is_empty() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(25));
    }

    assert_eq!(*seen.lock(), vec![request.id()]);
}

// Integration tests with wiremock
#[cfg(feature = "integration-tests")]
mod integration_tests {
    use super::*;

    use signet_net::http::{
        AbortedEvent, CompletedEvent, FailedEvent, HttpMethod, ProgressEvent, RequestBody,
        RequestConfig, ResponseType, StateChangedEvent, TimedOutEvent, runtime,
    };
    use tokio::time::timeout;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Event log for one request, covering all six channels.
    #[derive(Default)]
    struct Recorder {
        completed: Mutex<Vec<CompletedEvent>>,
        failed: Mutex<Vec<FailedEvent>>,
        aborted: Mutex<Vec<AbortedEvent>>,
        timed_out: Mutex<Vec<TimedOutEvent>>,
        states: Mutex<Vec<StateChangedEvent>>,
        progress: Mutex<Vec<ProgressEvent>>,
    }

    /// Subscribe a fresh recorder to all six channels of a request.
    fn record(request: &HttpRequest) -> Arc<Recorder> {
        let recorder = Arc::new(Recorder::default());
        let r = recorder.clone();
        request.events().completed.connect(move |event| {
            r.completed.lock().push(event.clone());
        });
        let r = recorder.clone();
        request.events().failed.connect(move |event| {
            r.failed.lock().push(event.clone());
        });
        let r = recorder.clone();
        request.events().aborted.connect(move |event| {
            r.aborted.lock().push(event.clone());
        });
        let r = recorder.clone();
        request.events().timed_out.connect(move |event| {
            r.timed_out.lock().push(event.clone());
        });
        let r = recorder.clone();
        request.events().state_changed.connect(move |event| {
            r.states.lock().push(event.clone());
        });
        let r = recorder.clone();
        request.events().progress_changed.connect(move |event| {
            r.progress.lock().push(event.clone());
        });
        recorder
    }

    impl Recorder {
        fn terminal_count(&self) -> usize {
            self.completed.lock().len()
                + self.failed.lock().len()
                + self.aborted.lock().len()
                + self.timed_out.lock().len()
        }

        fn state_sequence(&self) -> Vec<RequestState> {
            self.states.lock().iter().map(|event| event.state).collect()
        }
    }

    /// Wait until the request reaches its terminal notification.
    async fn wait_for_terminal(recorder: &Arc<Recorder>) {
        timeout(Duration::from_secs(10), async {
            loop {
                if recorder.terminal_count() > 0 {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
        })
        .await
        .expect("request did not terminate in time");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_successful_exchange() {
        let mock_server = MockServer::start().await;
        let body = r#"{"name":"signet","ok":true}"#;

        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "application/json"),
            )
            .mount(&mock_server)
            .await;

        let mut request = HttpRequest::new();
        request.set_url(format!("{}/data", mock_server.uri()));
        request.set_response_type(ResponseType::Json);

        let recorder = record(&request);

        request.send();
        wait_for_terminal(&recorder).await;

        // Exactly one completed, no other terminal notification
        let completed = recorder.completed.lock();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].status, 200);
        assert_eq!(
            completed[0].response.as_json(),
            Some(&serde_json::json!({"name": "signet", "ok": true}))
        );
        assert!(recorder.failed.lock().is_empty());
        assert!(recorder.aborted.lock().is_empty());
        assert!(recorder.timed_out.lock().is_empty());

        // Strict state progression, one notification per transition
        assert_eq!(
            recorder.state_sequence(),
            vec![
                RequestState::Opened,
                RequestState::HeadersReceived,
                RequestState::Loading,
                RequestState::Done,
            ]
        );

        // Progress reported the received bytes
        let progress = recorder.progress.lock();
        assert!(!progress.is_empty());
        let last = progress.last().unwrap();
        assert_eq!(last.progress.bytes_received, body.len() as u64);
        assert_eq!(last.progress.total_bytes, Some(body.len() as u64));

        // Observation accessors read the finished exchange
        assert_eq!(request.state(), RequestState::Done);
        assert_eq!(request.status(), 200);
        assert_eq!(request.status_text(), "OK");
        assert_eq!(request.response_text(), body);
        assert_eq!(
            request.response_header("content-type").as_deref(),
            Some("application/json")
        );
        assert!(
            request
                .response_headers()
                .contains("content-type: application/json\r\n")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_accumulated_header_values_are_submitted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let mut request = HttpRequest::new();
        request.set_url(mock_server.uri());
        request.set_header("x-tag", "a");
        request.set_header("x-tag", "b");

        let recorder = record(&request);

        request.send();
        wait_for_terminal(&recorder).await;
        assert_eq!(recorder.completed.lock().len(), 1);

        let received = mock_server
            .received_requests()
            .await
            .expect("request recording enabled");
        assert_eq!(received.len(), 1);
        let tags: Vec<&str> = received[0]
            .headers
            .get_all("x-tag")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        assert_eq!(tags, ["a", "b"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_json_body_reaches_the_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&mock_server)
            .await;

        let mut request = HttpRequest::new();
        request.set_url(format!("{}/items", mock_server.uri()));
        request.set_method(HttpMethod::Post);
        request.set_data(RequestBody::json(&serde_json::json!({"name": "item"})).unwrap());

        let recorder = record(&request);

        request.send();
        wait_for_terminal(&recorder).await;
        assert_eq!(recorder.completed.lock()[0].status, 201);

        let received = mock_server
            .received_requests()
            .await
            .expect("request recording enabled");
        let sent: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(sent, serde_json::json!({"name": "item"}));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_http_error_status_completes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&mock_server)
            .await;

        let mut request = HttpRequest::new();
        request.set_url(format!("{}/missing", mock_server.uri()));

        let recorder = record(&request);

        request.send();
        wait_for_terminal(&recorder).await;

        // 4xx is not a failure: the exchange itself succeeded
        let completed = recorder.completed.lock();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].status, 404);
        assert!(recorder.failed.lock().is_empty());
        assert_eq!(request.status(), 404);
        assert_eq!(request.status_text(), "Not Found");
        assert_eq!(request.response_text(), "nope");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_abort_fires_aborted_only() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&mock_server)
            .await;

        let mut request = HttpRequest::new();
        request.set_url(format!("{}/slow", mock_server.uri()));

        let recorder = record(&request);

        request.send();

        // Give the exchange a moment to get underway, then cancel it
        tokio::time::sleep(Duration::from_millis(100)).await;
        request.abort();

        wait_for_terminal(&recorder).await;

        assert_eq!(recorder.aborted.lock().len(), 1);
        assert!(recorder.completed.lock().is_empty());
        assert!(recorder.failed.lock().is_empty());
        assert!(recorder.timed_out.lock().is_empty());
        assert_eq!(request.state(), RequestState::Done);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_timeout_fires_timed_out_only() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&mock_server)
            .await;

        let mut request = HttpRequest::new();
        request.set_url(format!("{}/slow", mock_server.uri()));
        request.set_timeout(Duration::from_millis(200));

        let recorder = record(&request);

        request.send();
        wait_for_terminal(&recorder).await;

        assert_eq!(recorder.timed_out.lock().len(), 1);
        assert!(recorder.completed.lock().is_empty());
        assert!(recorder.failed.lock().is_empty());
        assert!(recorder.aborted.lock().is_empty());
        assert_eq!(request.state(), RequestState::Done);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreachable_server_fires_failed() {
        // Nothing listens on port 1
        let mut request = HttpRequest::new();
        request.set_url("http://127.0.0.1:1/");

        let recorder = record(&request);

        request.send();
        wait_for_terminal(&recorder).await;

        assert_eq!(recorder.failed.lock().len(), 1);
        assert!(recorder.completed.lock().is_empty());
        assert_eq!(request.state(), RequestState::Done);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mime_override_steers_auto_parsing() {
        let mock_server = MockServer::start().await;
        let body = r#"{"ok":true}"#;

        Mock::given(method("GET"))
            .and(path("/mislabeled"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/plain"),
            )
            .mount(&mock_server)
            .await;

        // Without the override, Auto follows the (text) content type
        let mut plain = HttpRequest::new();
        plain.set_url(format!("{}/mislabeled", mock_server.uri()));
        let plain_recorder = record(&plain);
        plain.send();
        wait_for_terminal(&plain_recorder).await;
        assert_eq!(
            plain_recorder.completed.lock()[0].response.as_text(),
            Some(body)
        );

        // With the override, the mislabeled body parses as JSON
        let mut overridden = HttpRequest::new();
        overridden.set_url(format!("{}/mislabeled", mock_server.uri()));
        overridden.set_mime_type("application/json");
        let overridden_recorder = record(&overridden);
        overridden.send();
        wait_for_terminal(&overridden_recorder).await;
        assert_eq!(
            overridden_recorder.completed.lock()[0].response.as_json(),
            Some(&serde_json::json!({"ok": true}))
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_binary_response_type() {
        let mock_server = MockServer::start().await;
        let payload = vec![0u8, 159, 146, 150];

        Mock::given(method("GET"))
            .and(path("/blob"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .mount(&mock_server)
            .await;

        let request = HttpRequest::with_config(RequestConfig {
            url: Some(format!("{}/blob", mock_server.uri())),
            response_type: Some(ResponseType::Binary),
            ..Default::default()
        });

        let recorder = record(&request);

        request.send();
        wait_for_terminal(&recorder).await;

        let completed = recorder.completed.lock();
        assert_eq!(
            completed[0].response.as_bytes().map(|b| b.as_ref()),
            Some(payload.as_slice())
        );
    }

    #[test]
    fn test_sync_send_observes_completion_before_returning() {
        let mock_server = runtime::block_on(MockServer::start());
        runtime::block_on(
            Mock::given(method("GET"))
                .and(path("/sync"))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
                .mount(&mock_server),
        );

        let mut request = HttpRequest::new();
        request.set_url(format!("{}/sync", mock_server.uri()));
        request.set_async(false);

        let recorder = record(&request);

        request.send();

        // Everything fired on this thread before send returned
        assert_eq!(recorder.completed.lock().len(), 1);
        assert_eq!(
            recorder.state_sequence(),
            vec![
                RequestState::Opened,
                RequestState::HeadersReceived,
                RequestState::Loading,
                RequestState::Done,
            ]
        );
        assert_eq!(request.status(), 200);
        assert_eq!(request.response_text(), "ok");
    }
}
