//! cardiorisk-client
//!
//! Everything that talks to the scoring service or to durable client
//! storage: the service trait and its HTTP implementation, the session
//! identity provider, and the submission and history flows built on them.

pub mod api;
pub mod error;
pub mod features;
pub mod history;
pub mod http;
pub mod session;
pub mod store;
pub mod submission;
pub mod workbench;
