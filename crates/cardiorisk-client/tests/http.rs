//! Exercises the HTTP client against a one-shot canned server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use cardiorisk_client::api::ScoringApi;
use cardiorisk_client::error::{ApiError, SubmitError};
use cardiorisk_client::http::HttpScoringClient;
use cardiorisk_client::session::SessionIdentity;
use cardiorisk_core::form::FormRecord;

struct Captured {
    head: String,
    body: String,
}

/// Serve exactly one request with `status` and `body`, handing back what
/// the client sent.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
            if line == "\r\n" || line.is_empty() {
                break;
            }
            head.push_str(&line);
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        let _ = tx.send(Captured {
            head,
            body: String::from_utf8(request_body).unwrap(),
        });
    });

    (format!("http://{addr}/api"), rx)
}

#[tokio::test]
async fn features_are_decoded_in_order() {
    let (url, rx) = serve_once(
        "200 OK",
        r#"{"feature_order": ["sex", "age"], "features": {
            "age": {"name": "Age", "unit": "years", "min": 1, "max": 120},
            "sex": {"name": "Sex", "options": {"1": "Male", "0": "Female"}}
        }}"#,
    );
    let client = HttpScoringClient::new(url, Duration::from_secs(5));

    let schema = client.features().await.unwrap();

    assert_eq!(schema.order(), ["sex", "age"]);
    assert!(schema.descriptor("sex").unwrap().is_categorical());
    let captured = rx.recv().unwrap();
    assert!(captured.head.starts_with("GET /api/features "));
}

#[tokio::test]
async fn predict_sends_the_session_header_and_surfaces_rejections() {
    let (url, rx) = serve_once(
        "400 Bad Request",
        r#"{"error": "Missing required features: ['chol']"}"#,
    );
    let client = HttpScoringClient::new(url, Duration::from_secs(5));
    let record: FormRecord = [("age".to_string(), "55".to_string())].into_iter().collect();
    let session = SessionIdentity::from("session_1700000000000_abcdef123".to_string());

    let err = client.predict(&record, &session).await.unwrap_err();

    assert!(matches!(
        &err,
        ApiError::Status { status: 400, message: Some(m) } if m == "Missing required features: ['chol']"
    ));
    assert_eq!(
        SubmitError::from(err).user_message(),
        "Missing required features: ['chol']"
    );

    let captured = rx.recv().unwrap();
    assert!(captured.head.starts_with("POST /api/predict "));
    assert!(
        captured
            .head
            .to_ascii_lowercase()
            .contains("x-session-id: session_1700000000000_abcdef123")
    );
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({"age": "55"}));
}

#[tokio::test]
async fn unknown_session_history_is_not_found() {
    let (url, rx) = serve_once("404 Not Found", r#"{"error": "User not found"}"#);
    let client = HttpScoringClient::new(url, Duration::from_secs(5));
    let session = SessionIdentity::from("session_1_abc".to_string());

    let err = client.history(&session).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("User not found"));
    assert!(rx.recv().unwrap().head.starts_with("GET /api/history/session_1_abc "));
}

#[tokio::test]
async fn error_status_without_json_body_has_no_message() {
    let (url, _rx) = serve_once("502 Bad Gateway", "upstream down");
    let client = HttpScoringClient::new(url, Duration::from_secs(5));

    let err = client.health().await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.server_message(), None);
}
