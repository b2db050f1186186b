//! Plain-text rendering of fields, results and history.

use std::fmt::Write;

use cardiorisk_core::controls::{FieldView, InputControl};
use cardiorisk_core::models::history::{HistoryEntry, SessionHistory};
use cardiorisk_core::models::prediction::{PredictionResult, RiskLevel};

pub const GAUGE_WIDTH: usize = 20;
pub const NO_PREDICTIONS: &str = "No predictions found.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Marker shown before a risk badge. Unknown labels get `?`.
pub fn risk_marker(level: Option<RiskLevel>) -> &'static str {
    match level {
        Some(RiskLevel::Low) => "+",
        Some(RiskLevel::Moderate) => "!",
        Some(RiskLevel::High) => "!!",
        None => "?",
    }
}

/// When the history was started, or the raw value if it does not parse.
pub fn started_at(history: &SessionHistory) -> String {
    match history.started() {
        Some(dt) => dt.strftime(TIMESTAMP_FORMAT).to_string(),
        None => history.user.created_at.clone(),
    }
}

/// When the entry was recorded, or the raw value if it does not parse.
pub fn recorded_at(entry: &HistoryEntry) -> String {
    match entry.created() {
        Some(dt) => dt.strftime(TIMESTAMP_FORMAT).to_string(),
        None => entry.created_at.clone(),
    }
}

/// `[#########-----------] 45%`. Out-of-range percentages are clamped.
pub fn risk_gauge(risk_percentage: f64) -> String {
    let clamped = risk_percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled),
        risk_percentage
    )
}

/// The prompt line for one field: label plus its allowed input.
pub fn field_prompt(view: &FieldView) -> String {
    match &view.control {
        InputControl::Select { options, .. } => {
            let choices: Vec<String> = options
                .iter()
                .map(|o| format!("{}={}", o.value, o.label))
                .collect();
            format!("{} [{}]", view.label, choices.join(", "))
        }
        InputControl::Number { range_hint, .. } => match range_hint {
            Some(hint) => format!("{} ({hint})", view.label),
            None => view.label.clone(),
        },
    }
}

/// One block per field for the `features` command.
pub fn render_features(views: &[FieldView]) -> String {
    let mut out = String::new();
    for view in views {
        let _ = writeln!(out, "{} ({})", view.label, view.id);
        match &view.control {
            InputControl::Select { options, .. } => {
                for option in options {
                    let _ = writeln!(out, "    {} = {}", option.value, option.label);
                }
            }
            InputControl::Number {
                range_hint, step, ..
            } => {
                if let Some(hint) = range_hint {
                    let _ = writeln!(out, "    {hint}");
                }
                let _ = writeln!(out, "    step {step}");
            }
        }
    }
    out
}

pub fn render_result(result: &PredictionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Risk Assessment Complete");
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", risk_gauge(result.risk_percentage));
    let _ = writeln!(out, "  {} {} Risk", risk_marker(result.level()), result.risk_level);
    let _ = writeln!(out);
    let _ = writeln!(out, "Diagnosis:      {}", result.interpretation.result);
    let _ = writeln!(out, "Confidence:     {}", result.interpretation.confidence);
    let _ = writeln!(out, "Recommendation: {}", result.interpretation.recommendation);
    if let Some(id) = result.prediction_id {
        let _ = writeln!(out, "Prediction ID:  {id}");
    }
    out
}

/// `2024-05-01 09:30  !! High Risk (72%)` followed by result and confidence.
pub fn render_history_entry(entry: &HistoryEntry) -> String {
    let recorded = &entry.prediction_results;
    format!(
        "{}  {} {} Risk ({}%)\n    Result: {}\n    Confidence: {}%\n",
        recorded_at(entry),
        risk_marker(recorded.level()),
        recorded.risk_level,
        recorded.risk_percentage,
        recorded.outcome_label(),
        recorded.confidence
    )
}

pub fn render_history(history: &SessionHistory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Session Summary");
    let _ = writeln!(out, "  Total Predictions: {}", history.predictions.len());
    let _ = writeln!(out, "  Session ID: {}", history.user.session_id);
    let _ = writeln!(out, "  Started: {}", started_at(history));
    let _ = writeln!(out);
    let _ = writeln!(out, "Previous Predictions");

    if history.is_empty() {
        let _ = writeln!(out, "  {NO_PREDICTIONS}");
        return out;
    }
    for entry in &history.predictions {
        out.push_str(&render_history_entry(entry));
    }
    out
}
