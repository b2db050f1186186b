mod common;

use std::sync::Arc;
use std::time::Duration;

use cardiorisk_client::error::{GENERIC_SUBMIT_MESSAGE, SubmitError};
use cardiorisk_client::submission::SubmissionManager;
use common::{FakeApi, Reply, high_risk, memory_sessions, record};

const TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::test]
async fn successful_submission_carries_the_session_header() {
    let api = Arc::new(FakeApi::new());
    let (_store, sessions) = memory_sessions();
    let manager = SubmissionManager::new(api.clone(), sessions.clone(), TIMEOUT);

    let result = manager.submit(&record(&[("age", "55")])).await.unwrap();

    assert_eq!(result, high_risk());
    let session = sessions.current().expect("identity created on first submit");
    assert_eq!(api.sessions_seen(), vec![session.as_str().to_string()]);
    assert_eq!(api.records_seen.lock().unwrap()[0].get("age"), Some("55"));
}

#[tokio::test]
async fn later_submissions_reuse_the_identity() {
    let api = Arc::new(FakeApi::new());
    let (_store, sessions) = memory_sessions();
    let manager = SubmissionManager::new(api.clone(), sessions, TIMEOUT);

    manager.submit(&record(&[("age", "55")])).await.unwrap();
    manager.submit(&record(&[("age", "60")])).await.unwrap();

    let seen = api.sessions_seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[tokio::test]
async fn server_rejection_is_shown_verbatim() {
    let mut api = FakeApi::new();
    api.predict = Reply::Status(400, Some("Missing required features: ['chol']".to_string()));
    let (_store, sessions) = memory_sessions();
    let manager = SubmissionManager::new(Arc::new(api), sessions, TIMEOUT);

    let err = manager.submit(&record(&[("age", "55")])).await.unwrap_err();

    assert!(matches!(err, SubmitError::Rejected(_)));
    assert_eq!(err.user_message(), "Missing required features: ['chol']");
}

#[tokio::test]
async fn failures_without_a_server_message_are_generic() {
    for reply in [Reply::Status(502, None), Reply::Transport] {
        let mut api = FakeApi::new();
        api.predict = reply;
        let (_store, sessions) = memory_sessions();
        let manager = SubmissionManager::new(Arc::new(api), sessions, TIMEOUT);

        let err = manager.submit(&record(&[("age", "55")])).await.unwrap_err();

        assert!(matches!(err, SubmitError::Failed(_)));
        assert_eq!(err.user_message(), GENERIC_SUBMIT_MESSAGE);
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_service_times_out() {
    let mut api = FakeApi::new();
    api.predict = Reply::Hang;
    let (_store, sessions) = memory_sessions();
    let manager = SubmissionManager::new(Arc::new(api), sessions, Duration::from_secs(5));

    let err = manager.submit(&record(&[("age", "55")])).await.unwrap_err();

    assert!(matches!(err, SubmitError::Timeout(d) if d == Duration::from_secs(5)));
    assert!(err.user_message().contains("did not respond in time"));
}
