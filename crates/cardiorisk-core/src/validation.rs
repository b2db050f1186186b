use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::form::FormRecord;
use crate::schema::{FeatureSchema, FieldDescriptor};

/// Per-field error messages from one validation pass. Fields without an
/// entry are valid; an empty result means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationResult {
    pub errors: IndexMap<String, String>,
}

impl ValidationResult {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn clear_field(&mut self, id: &str) -> bool {
        self.errors.shift_remove(id).is_some()
    }
}

/// Parse a raw entry the way the form treats numbers: surrounding whitespace
/// is ignored and NaN is not a number.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Validate one raw value against its descriptor.
///
/// Rules run in order required → numeric → min → max. A missing or
/// unparseable value stops the pass; otherwise a later failing bound replaces
/// the message of an earlier one, so only the last failure is reported.
pub fn validate_field(descriptor: &FieldDescriptor, raw: &str) -> Option<String> {
    let name = descriptor.name();

    if raw.is_empty() {
        return Some(format!("{name} is required"));
    }

    // Categorical codes are numeric too, so they go through the same parse.
    let Some(value) = parse_number(raw) else {
        return Some(format!("{name} must be a valid number"));
    };

    let mut error = None;
    if let Some(min) = descriptor.min()
        && value < min
    {
        error = Some(format!("{name} must be at least {min}"));
    }
    if let Some(max) = descriptor.max()
        && value > max
    {
        error = Some(format!("{name} must be at most {max}"));
    }
    error
}

/// Validate every field of `record` in schema order. Fields absent from the
/// record count as empty.
pub fn validate(schema: &FeatureSchema, record: &FormRecord) -> ValidationResult {
    let errors = schema
        .fields()
        .filter_map(|(id, descriptor)| {
            let raw = record.get(id).unwrap_or_default();
            validate_field(descriptor, raw).map(|msg| (id.to_string(), msg))
        })
        .collect();
    ValidationResult { errors }
}
