use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::prediction::{self, RiskLevel};

/// Response of `GET /history/{session_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionHistory {
    pub user: SessionUser,
    /// Newest first, as ordered by the service.
    pub predictions: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionUser {
    pub session_id: String,
    pub created_at: String,
    #[serde(default)]
    pub predictions_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryEntry {
    pub id: i64,
    pub created_at: String,
    pub prediction_results: RecordedPrediction,
    /// The submitted measurements, coerced to numbers by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_features: Option<IndexMap<String, f64>>,
}

/// The stored subset of a [`PredictionResult`](super::prediction::PredictionResult).
/// Confidence is kept as a number rather than the "NN.NN%" display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordedPrediction {
    pub prediction: u8,
    pub risk_percentage: f64,
    pub risk_level: String,
    pub confidence: f64,
}

impl SessionHistory {
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn started(&self) -> Option<jiff::civil::DateTime> {
        parse_created_at(&self.user.created_at)
    }
}

impl HistoryEntry {
    pub fn created(&self) -> Option<jiff::civil::DateTime> {
        parse_created_at(&self.created_at)
    }
}

impl RecordedPrediction {
    pub fn outcome_label(&self) -> &'static str {
        prediction::outcome_label(self.prediction)
    }

    pub fn level(&self) -> Option<RiskLevel> {
        RiskLevel::parse(&self.risk_level)
    }
}

/// Parse a service timestamp. The service writes naive UTC ISO-8601
/// (`2024-05-01T09:30:00.123456`); offset-qualified values are converted to UTC.
pub fn parse_created_at(raw: &str) -> Option<jiff::civil::DateTime> {
    if let Ok(ts) = raw.parse::<jiff::Timestamp>() {
        return Some(ts.to_zoned(jiff::tz::TimeZone::UTC).datetime());
    }
    raw.parse::<jiff::civil::DateTime>().ok()
}
