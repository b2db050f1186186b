//! Feature schema served by the scoring service.
//!
//! The wire format describes every field with one flat object and marks
//! categorical fields only by the presence of an `options` map. On receipt the
//! flat shape is converted into the tagged [`FieldDescriptor`] so that every
//! consumer matches on the variant instead of probing for keys.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single field as it appears on the wire under `features.<id>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<IndexMap<String, String>>,
}

/// The `GET /features` payload before its invariants are checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireSchema {
    pub feature_order: Vec<String>,
    pub features: HashMap<String, WireDescriptor>,
}

/// How a field is entered and constrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireDescriptor", into = "WireDescriptor")]
pub enum FieldDescriptor {
    /// Free numeric entry with optional inclusive bounds.
    Numeric {
        name: String,
        unit: Option<String>,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Closed choice between numerically coded values. Map order is display order.
    Categorical {
        name: String,
        options: IndexMap<String, String>,
    },
}

impl FieldDescriptor {
    /// Human-readable field name used in labels and error messages.
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Categorical { name, .. } => name,
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical { .. })
    }

    /// Inclusive lower bound. Categorical fields never declare one.
    pub fn min(&self) -> Option<f64> {
        match self {
            Self::Numeric { min, .. } => *min,
            Self::Categorical { .. } => None,
        }
    }

    /// Inclusive upper bound. Categorical fields never declare one.
    pub fn max(&self) -> Option<f64> {
        match self {
            Self::Numeric { max, .. } => *max,
            Self::Categorical { .. } => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            Self::Numeric { unit, .. } => unit.as_deref(),
            Self::Categorical { .. } => None,
        }
    }
}

impl From<WireDescriptor> for FieldDescriptor {
    fn from(wire: WireDescriptor) -> Self {
        match wire.options {
            Some(options) => Self::Categorical {
                name: wire.name,
                options,
            },
            None => Self::Numeric {
                name: wire.name,
                unit: wire.unit,
                min: wire.min,
                max: wire.max,
            },
        }
    }
}

impl From<FieldDescriptor> for WireDescriptor {
    fn from(descriptor: FieldDescriptor) -> Self {
        match descriptor {
            FieldDescriptor::Numeric {
                name,
                unit,
                min,
                max,
            } => WireDescriptor {
                name,
                unit,
                min,
                max,
                options: None,
            },
            FieldDescriptor::Categorical { name, options } => WireDescriptor {
                name,
                options: Some(options),
                ..Default::default()
            },
        }
    }
}

/// Ordered set of fields the scoring service requires.
///
/// Construction guarantees that every id in the order has exactly one
/// descriptor and that the order contains no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireSchema", into = "WireSchema")]
pub struct FeatureSchema {
    order: Vec<String>,
    features: HashMap<String, FieldDescriptor>,
}

impl FeatureSchema {
    pub fn new(
        order: Vec<String>,
        mut features: HashMap<String, FieldDescriptor>,
    ) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(order.len());
        for id in &order {
            if !seen.insert(id.as_str()) {
                return Err(CoreError::DuplicateFeature(id.clone()));
            }
            if !features.contains_key(id) {
                return Err(CoreError::MissingDescriptor(id.clone()));
            }
        }
        // Descriptors outside the order are never rendered or validated.
        features.retain(|id, _| seen.contains(id.as_str()));

        Ok(Self { order, features })
    }

    /// Parse a raw `GET /features` body.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Field ids in rendering and validation order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn descriptor(&self, id: &str) -> Option<&FieldDescriptor> {
        self.features.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.features.contains_key(id)
    }

    /// Iterate `(id, descriptor)` pairs in `feature_order`.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.order
            .iter()
            .filter_map(|id| self.features.get(id).map(|d| (id.as_str(), d)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl TryFrom<WireSchema> for FeatureSchema {
    type Error = CoreError;

    fn try_from(wire: WireSchema) -> Result<Self, Self::Error> {
        let features = wire
            .features
            .into_iter()
            .map(|(id, d)| (id, FieldDescriptor::from(d)))
            .collect();
        Self::new(wire.feature_order, features)
    }
}

impl From<FeatureSchema> for WireSchema {
    fn from(schema: FeatureSchema) -> Self {
        WireSchema {
            feature_order: schema.order,
            features: schema
                .features
                .into_iter()
                .map(|(id, d)| (id, WireDescriptor::from(d)))
                .collect(),
        }
    }
}
