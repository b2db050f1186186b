//! cardiorisk-core
//!
//! Pure domain types for the CardioRisk client: the feature schema, the form
//! engine and its validation rules, and the prediction/history models returned
//! by the scoring service. No I/O; this is the shared vocabulary of the
//! client and whatever renders it.

pub mod controls;
pub mod error;
pub mod form;
pub mod models;
pub mod schema;
pub mod validation;
