//! Input control selection for the rendering layer.
//!
//! Controls follow the descriptor variant. The one exception is ST
//! depression (`oldpeak`), which is entered in tenths of a millimetre and so
//! gets a finer step than every other numeric field.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::form::FormEngine;
use crate::schema::FieldDescriptor;

/// The field entered with [`FINE_STEP`] granularity.
pub const FINE_STEP_FIELD: &str = "oldpeak";

pub const FINE_STEP: f64 = 0.1;
pub const DEFAULT_STEP: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "control", rename_all = "snake_case")]
#[ts(export)]
pub enum InputControl {
    /// Closed choice. The placeholder is the empty (unselected) entry.
    Select {
        placeholder: String,
        options: Vec<SelectOption>,
    },
    /// Free numeric entry.
    Number {
        placeholder: String,
        min: Option<f64>,
        max: Option<f64>,
        unit: Option<String>,
        step: f64,
        range_hint: Option<String>,
    },
}

/// Everything the rendering layer needs to draw one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub control: InputControl,
    pub value: String,
    pub error: Option<String>,
    pub disabled: bool,
}

pub fn step_for(id: &str) -> f64 {
    if id == FINE_STEP_FIELD {
        FINE_STEP
    } else {
        DEFAULT_STEP
    }
}

/// "Range: 1 - 120 years", shown only when both bounds are declared.
pub fn range_hint(descriptor: &FieldDescriptor) -> Option<String> {
    let (min, max) = (descriptor.min()?, descriptor.max()?);
    let hint = format!("Range: {min} - {max} {}", descriptor.unit().unwrap_or_default());
    Some(hint.trim_end().to_string())
}

pub fn control_for(id: &str, descriptor: &FieldDescriptor) -> InputControl {
    match descriptor {
        FieldDescriptor::Categorical { name, options } => InputControl::Select {
            placeholder: format!("Select {name}"),
            options: options
                .iter()
                .map(|(value, label)| SelectOption {
                    value: value.clone(),
                    label: label.clone(),
                })
                .collect(),
        },
        FieldDescriptor::Numeric {
            name,
            unit,
            min,
            max,
        } => InputControl::Number {
            placeholder: format!("Enter {}", name.to_lowercase()),
            min: *min,
            max: *max,
            unit: unit.clone(),
            step: step_for(id),
            range_hint: range_hint(descriptor),
        },
    }
}

impl FormEngine {
    /// One view per field, in schema order, carrying the current value and
    /// any error from the last submission attempt.
    pub fn field_views(&self) -> Vec<FieldView> {
        self.schema()
            .fields()
            .map(|(id, descriptor)| FieldView {
                id: id.to_string(),
                label: descriptor.name().to_string(),
                required: true,
                control: control_for(id, descriptor),
                value: self.record().get(id).unwrap_or_default().to_string(),
                error: self.errors().get(id).map(str::to_string),
                disabled: self.is_busy(),
            })
            .collect()
    }
}
