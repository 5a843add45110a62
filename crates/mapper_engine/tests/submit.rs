use std::sync::{Arc, Mutex};
use std::time::Duration;

use mapper_core::{Options, Payload};
use mapper_engine::{
    ClientEvent, ClientSettings, ConversionApi, FailureKind, JobProgress, ProgressSink,
    ReqwestClient, Stage,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings_for(server: &MockServer) -> ClientSettings {
    ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    }
}

fn pdf_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "application/pdf")
        .insert_header("Content-Disposition", r#"attachment; filename="out.pdf""#)
        .set_body_bytes(b"%PDF-1.4 fake".to_vec())
}

#[tokio::test]
async fn text_submit_posts_json_body_and_returns_artifact() {
    let server = MockServer::start().await;
    let expected_body = serde_json::json!({
        "payload": "hello",
        "options": {
            "filename": "",
            "extension": ".pdf",
            "context": "default",
            "model": "gpt-4o",
            "temperature": 0.1,
            "num_nodes": 12,
            "show_node_props": false,
            "show_edge_props": false,
            "show_labels": true,
        },
    });
    Mock::given(method("POST"))
        .and(path("/text"))
        .and(body_json(&expected_body))
        .respond_with(pdf_response())
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestClient::new(settings_for(&server));
    let sink = TestSink::new();

    let response = client
        .submit(
            1,
            &Payload::Text("hello".to_string()),
            &Options::default(),
            &sink,
        )
        .await
        .expect("submit ok");

    assert_eq!(response.bytes, b"%PDF-1.4 fake");
    assert_eq!(
        response.disposition.as_deref(),
        Some(r#"attachment; filename="out.pdf""#)
    );
    assert_eq!(response.content_type.as_deref(), Some("application/pdf"));

    let stages = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            ClientEvent::Progress(JobProgress { stage, .. }) => Some(stage),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert!(stages.contains(&Stage::Sending));
    assert!(stages.contains(&Stage::Downloading));
}

#[tokio::test]
async fn url_submit_hits_url_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/url"))
        .respond_with(pdf_response())
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestClient::new(settings_for(&server));
    let sink = TestSink::new();

    let response = client
        .submit(
            2,
            &Payload::Url("https://en.wikipedia.org/wiki/Concept_map".to_string()),
            &Options::default(),
            &sink,
        )
        .await
        .expect("submit ok");
    assert_eq!(response.bytes, b"%PDF-1.4 fake");
}

#[tokio::test]
async fn file_submit_sends_multipart_with_options_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/file-upload"))
        .respond_with(pdf_response())
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestClient::new(settings_for(&server));
    let sink = TestSink::new();

    client
        .submit(
            3,
            &Payload::File {
                name: "notes.txt".to_string(),
                bytes: b"some notes".to_vec(),
            },
            &Options::default(),
            &sink,
        )
        .await
        .expect("submit ok");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="notes.txt""#));
    assert!(body.contains("some notes"));
    assert!(body.contains(r#"name="options""#));
    assert!(body.contains(r#""model":"gpt-4o""#));
}

#[tokio::test]
async fn error_body_detail_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "detail": "model unavailable",
            })),
        )
        .mount(&server)
        .await;

    let client = ReqwestClient::new(settings_for(&server));
    let sink = TestSink::new();

    let err = client
        .submit(4, &Payload::Text("hello".to_string()), &Options::default(), &sink)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.user_message(), "An error occurred:\nmodel unavailable");
}

#[tokio::test]
async fn error_without_detail_reports_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ReqwestClient::new(settings_for(&server));
    let sink = TestSink::new();

    let err = client
        .submit(5, &Payload::Text("hello".to_string()), &Options::default(), &sink)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    // The status code appears once, on the Status line; the Message line
    // carries the reason phrase.
    assert_eq!(
        err.user_message(),
        "An error occurred:\nStatus: 404\nMessage: Not Found"
    );
}

#[tokio::test]
async fn network_failure_reports_status_zero() {
    // Unroutable port: connection refused.
    let settings = ClientSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
        ..ClientSettings::default()
    };
    let client = ReqwestClient::new(settings);
    let sink = TestSink::new();

    let err = client
        .submit(6, &Payload::Text("hello".to_string()), &Options::default(), &sink)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 0);
    assert!(err
        .user_message()
        .starts_with("An error occurred:\nStatus: 0\nMessage: "));
}

#[tokio::test]
async fn submit_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(pdf_response().set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..settings_for(&server)
    };
    let client = ReqwestClient::new(settings);
    let sink = TestSink::new();

    let err = client
        .submit(7, &Payload::Text("hello".to_string()), &Options::default(), &sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn submit_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="big.pdf""#)
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_bytes: 10,
        ..settings_for(&server)
    };
    let client = ReqwestClient::new(settings);
    let sink = TestSink::new();

    let err = client
        .submit(8, &Payload::Text("hello".to_string()), &Options::default(), &sink)
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
