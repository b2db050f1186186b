//! Shared fixtures: an in-memory scoring service that records every call.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cardiorisk_client::api::{BoxFuture, ScoringApi, ServiceHealth};
use cardiorisk_client::error::ApiError;
use cardiorisk_client::session::{SessionIdentity, SessionProvider};
use cardiorisk_client::store::MemoryStore;
use cardiorisk_core::form::FormRecord;
use cardiorisk_core::models::history::SessionHistory;
use cardiorisk_core::models::prediction::{Interpretation, PredictionResult};
use cardiorisk_core::schema::FeatureSchema;

pub const SESSION_KEY: &str = "heart_prediction_session";

/// What the fake service does when an endpoint is called.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, Option<String>),
    Transport,
    /// Never answers.
    Hang,
}

impl<T: Send> Reply<T> {
    async fn resolve(self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Status(status, message) => Err(ApiError::Status { status, message }),
            Reply::Transport => Err(ApiError::Transport("connection refused".to_string())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub struct FakeApi {
    pub features: Reply<FeatureSchema>,
    pub predict: Reply<PredictionResult>,
    pub history: Reply<SessionHistory>,
    pub export: Reply<serde_json::Value>,
    pub calls: AtomicUsize,
    pub predict_calls: AtomicUsize,
    pub sessions_seen: Mutex<Vec<String>>,
    pub records_seen: Mutex<Vec<FormRecord>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            features: Reply::Ok(age_schema()),
            predict: Reply::Ok(high_risk()),
            history: Reply::Ok(empty_history("unused")),
            export: Reply::Ok(serde_json::json!({"total_predictions": 0, "predictions": []})),
            calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            sessions_seen: Mutex::new(Vec::new()),
            records_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub fn sessions_seen(&self) -> Vec<String> {
        self.sessions_seen.lock().unwrap().clone()
    }

    fn record_session(&self, session: &SessionIdentity) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sessions_seen
            .lock()
            .unwrap()
            .push(session.as_str().to_string());
    }
}

impl ScoringApi for FakeApi {
    fn features(&self) -> BoxFuture<'_, Result<FeatureSchema, ApiError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(self.features.clone().resolve())
    }

    fn predict<'a>(
        &'a self,
        record: &'a FormRecord,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<PredictionResult, ApiError>> {
        self.record_session(session);
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        self.records_seen.lock().unwrap().push(record.clone());
        Box::pin(self.predict.clone().resolve())
    }

    fn history<'a>(
        &'a self,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<SessionHistory, ApiError>> {
        self.record_session(session);
        Box::pin(self.history.clone().resolve())
    }

    fn export<'a>(
        &'a self,
        session: &'a SessionIdentity,
    ) -> BoxFuture<'a, Result<serde_json::Value, ApiError>> {
        self.record_session(session);
        Box::pin(self.export.clone().resolve())
    }

    fn health(&self) -> BoxFuture<'_, Result<ServiceHealth, ApiError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {
            Ok(ServiceHealth {
                status: "healthy".to_string(),
                model_loaded: true,
                scaler_loaded: true,
            })
        })
    }
}

pub fn age_schema() -> FeatureSchema {
    FeatureSchema::from_json(
        r#"{"feature_order": ["age"], "features": {"age": {"name": "Age", "min": 1, "max": 120}}}"#,
    )
    .unwrap()
}

pub fn high_risk() -> PredictionResult {
    PredictionResult {
        prediction: 1,
        risk_percentage: 72.0,
        risk_level: "High".to_string(),
        risk_color: "#dc3545".to_string(),
        interpretation: Interpretation {
            result: "Heart Disease Detected".to_string(),
            confidence: "72.0%".to_string(),
            recommendation: "High risk detected. Please consult with a cardiologist immediately for comprehensive evaluation and treatment planning.".to_string(),
        },
        prediction_id: Some(12),
        session_id: None,
    }
}

pub fn empty_history(session_id: &str) -> SessionHistory {
    serde_json::from_value(serde_json::json!({
        "user": {"session_id": session_id, "created_at": "2024-05-01T09:30:00", "predictions_count": 0},
        "predictions": []
    }))
    .unwrap()
}

pub fn record(pairs: &[(&str, &str)]) -> FormRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn memory_sessions() -> (Arc<MemoryStore>, Arc<SessionProvider>) {
    let store = Arc::new(MemoryStore::new());
    let provider = SessionProvider::open(store.clone(), SESSION_KEY).unwrap();
    (store, Arc::new(provider))
}
