use std::sync::Arc;

use cardiorisk_cli::render::{
    NO_PREDICTIONS, field_prompt, recorded_at, render_features, render_history, render_result,
    risk_gauge, risk_marker, started_at,
};
use cardiorisk_core::form::FormEngine;
use cardiorisk_core::models::history::SessionHistory;
use cardiorisk_core::models::prediction::{Interpretation, PredictionResult, RiskLevel};
use cardiorisk_core::schema::FeatureSchema;

fn form() -> FormEngine {
    let schema = FeatureSchema::from_json(
        r#"{"feature_order": ["age", "sex", "oldpeak"], "features": {
            "age": {"name": "Age", "unit": "years", "min": 1, "max": 120},
            "sex": {"name": "Sex", "options": {"0": "Female", "1": "Male"}},
            "oldpeak": {"name": "ST Depression", "min": 0, "max": 10}
        }}"#,
    )
    .unwrap();
    FormEngine::new(Arc::new(schema))
}

fn history(predictions: serde_json::Value) -> SessionHistory {
    serde_json::from_value(serde_json::json!({
        "user": {"session_id": "session_1714555800000_a1b2c3d4e", "created_at": "2024-05-01T09:30:00.123456"},
        "predictions": predictions
    }))
    .unwrap()
}

#[test]
fn gauge_fills_in_proportion_and_clamps() {
    assert_eq!(risk_gauge(0.0), "[--------------------] 0%");
    assert_eq!(risk_gauge(50.0), "[##########----------] 50%");
    assert_eq!(risk_gauge(72.5), "[###############-----] 72.5%");
    assert!(risk_gauge(130.0).starts_with("[####################]"));
}

#[test]
fn prompts_describe_the_allowed_input() {
    let views = form().field_views();

    assert_eq!(field_prompt(&views[0]), "Age (Range: 1 - 120 years)");
    assert_eq!(field_prompt(&views[1]), "Sex [0=Female, 1=Male]");
    assert_eq!(field_prompt(&views[2]), "ST Depression (Range: 0 - 10)");
}

#[test]
fn feature_listing_shows_fine_step_for_st_depression() {
    let listing = render_features(&form().field_views());

    assert!(listing.contains("Age (age)\n    Range: 1 - 120 years\n    step 1\n"));
    assert!(listing.contains("    1 = Male\n"));
    assert!(listing.contains("ST Depression (oldpeak)\n    Range: 0 - 10\n    step 0.1\n"));
}

#[test]
fn result_shows_service_fields_verbatim() {
    let result = PredictionResult {
        prediction: 1,
        risk_percentage: 72.0,
        risk_level: "High".to_string(),
        risk_color: "#dc3545".to_string(),
        interpretation: Interpretation {
            result: "Heart Disease Detected".to_string(),
            confidence: "72.0%".to_string(),
            recommendation: "Consult a cardiologist.".to_string(),
        },
        prediction_id: Some(3),
        session_id: None,
    };

    let text = render_result(&result);

    assert!(text.contains("[##############------] 72%"));
    assert!(text.contains("!! High Risk"));
    assert!(text.contains("Diagnosis:      Heart Disease Detected"));
    assert!(text.contains("Confidence:     72.0%"));
    assert!(text.contains("Prediction ID:  3"));
}

#[test]
fn empty_history_says_no_predictions() {
    let text = render_history(&history(serde_json::json!([])));

    assert!(text.contains("Total Predictions: 0"));
    assert!(text.contains("Started: 2024-05-01 09:30"));
    assert!(text.contains(NO_PREDICTIONS));
}

#[test]
fn history_rows_show_level_outcome_and_confidence() {
    let text = render_history(&history(serde_json::json!([
        {
            "id": 2,
            "created_at": "2024-05-01T10:15:00",
            "prediction_results": {"prediction": 0, "risk_percentage": 18.4, "risk_level": "Low", "confidence": 81.6}
        },
        {
            "id": 1,
            "created_at": "2024-05-01T09:31:00",
            "prediction_results": {"prediction": 1, "risk_percentage": 72, "risk_level": "High", "confidence": 72}
        }
    ])));

    assert!(text.contains("2024-05-01 10:15  + Low Risk (18.4%)\n    Result: No Heart Disease Detected\n    Confidence: 81.6%\n"));
    assert!(text.contains("!! High Risk (72%)\n    Result: Heart Disease Detected\n"));
    assert!(!text.contains(NO_PREDICTIONS));
}

#[test]
fn unparseable_timestamps_are_shown_raw() {
    let mut history = history(serde_json::json!([{
        "id": 1,
        "created_at": "2024-05-01T09:31:00Z",
        "prediction_results": {"prediction": 0, "risk_percentage": 10, "risk_level": "Unknown", "confidence": 90}
    }]));
    assert_eq!(started_at(&history), "2024-05-01 09:30");
    assert_eq!(recorded_at(&history.predictions[0]), "2024-05-01 09:31");
    assert!(render_history(&history).contains("  ? Unknown Risk (10%)"));

    history.user.created_at = "yesterday".to_string();
    history.predictions[0].created_at = "not a date".to_string();
    assert_eq!(started_at(&history), "yesterday");
    assert_eq!(recorded_at(&history.predictions[0]), "not a date");
}

#[test]
fn markers_follow_the_service_risk_level() {
    assert_eq!(risk_marker(Some(RiskLevel::Low)), "+");
    assert_eq!(risk_marker(Some(RiskLevel::Moderate)), "!");
    assert_eq!(risk_marker(Some(RiskLevel::High)), "!!");
    assert_eq!(risk_marker(None), "?");
}
