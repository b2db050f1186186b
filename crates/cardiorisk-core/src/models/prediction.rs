use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Response of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionResult {
    /// 1 when heart disease is predicted, 0 otherwise.
    pub prediction: u8,
    /// Probability of the positive class, 0 to 100.
    pub risk_percentage: f64,
    pub risk_level: String,
    /// Display color for the risk level, e.g. "#dc3545".
    pub risk_color: String,
    pub interpretation: Interpretation,
    /// Row id assigned by the service when the prediction was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<i64>,
    /// Session the service filed the prediction under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interpretation {
    pub result: String,
    pub confidence: String,
    pub recommendation: String,
}

impl PredictionResult {
    pub fn level(&self) -> Option<RiskLevel> {
        RiskLevel::parse(&self.risk_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Match a server label case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Outcome text for a prediction flag.
pub fn outcome_label(prediction: u8) -> &'static str {
    if prediction == 1 {
        "Heart Disease Detected"
    } else {
        "No Heart Disease Detected"
    }
}
