use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::models::prediction::PredictionResult;
use crate::schema::FeatureSchema;
use crate::validation::{self, ValidationResult};

/// Raw form input keyed by field id, in schema order. Serializes as the flat
/// JSON object the prediction endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord(IndexMap<String, String>);

impl FormRecord {
    /// One empty entry per field in `feature_order`.
    pub fn empty(schema: &FeatureSchema) -> Self {
        Self(
            schema
                .order()
                .iter()
                .map(|id| (id.clone(), String::new()))
                .collect(),
        )
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, id: &str, value: String) {
        if let Some(slot) = self.0.get_mut(id) {
            *slot = value;
        }
    }
}

impl FromIterator<(String, String)> for FormRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Editable form state derived from a [`FeatureSchema`].
///
/// Validation only runs when a submission is attempted. While a submission
/// is in flight the engine is busy: edits and further submissions are refused
/// until [`FormEngine::complete`] or [`FormEngine::fail`] is called.
#[derive(Debug, Clone)]
pub struct FormEngine {
    schema: Arc<FeatureSchema>,
    record: FormRecord,
    errors: ValidationResult,
    result: Option<PredictionResult>,
    failure: Option<String>,
    busy: bool,
}

impl FormEngine {
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        let record = FormRecord::empty(&schema);
        Self {
            schema,
            record,
            errors: ValidationResult::default(),
            result: None,
            failure: None,
            busy: false,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    /// Errors from the last submission attempt, minus fields edited since.
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    /// User-facing message of the last failed submission, if any.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Replace one field's raw value. A previously reported error for that
    /// field is dropped; errors on other fields stay.
    pub fn edit(&mut self, id: &str, value: impl Into<String>) -> Result<(), FormError> {
        if self.busy {
            return Err(FormError::Busy);
        }
        if !self.schema.contains(id) {
            return Err(FormError::UnknownField(id.to_string()));
        }
        self.record.set(id, value.into());
        self.errors.clear_field(id);
        Ok(())
    }

    /// Run the full validation pass and keep its result for rendering.
    pub fn validate(&mut self) -> &ValidationResult {
        self.errors = validation::validate(&self.schema, &self.record);
        &self.errors
    }

    /// Start a submission: re-validate, and if the form is clean enter the
    /// busy state and hand back the record to send.
    pub fn begin_submit(&mut self) -> Result<FormRecord, FormError> {
        if self.busy {
            return Err(FormError::Busy);
        }
        if !self.validate().is_empty() {
            return Err(FormError::Invalid(self.errors.clone()));
        }
        self.busy = true;
        self.result = None;
        self.failure = None;
        Ok(self.record.clone())
    }

    /// Finish the in-flight submission with a result.
    pub fn complete(&mut self, result: PredictionResult) {
        self.busy = false;
        self.failure = None;
        self.result = Some(result);
    }

    /// Finish the in-flight submission with a failure. No result is kept.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.result = None;
        self.failure = Some(message.into());
    }

    /// Start over with an empty record; clears result, failure and errors.
    /// Refused while a submission is in flight.
    pub fn reset(&mut self) -> Result<(), FormError> {
        if self.busy {
            return Err(FormError::Busy);
        }
        self.record = FormRecord::empty(&self.schema);
        self.errors = ValidationResult::default();
        self.result = None;
        self.failure = None;
        Ok(())
    }
}
