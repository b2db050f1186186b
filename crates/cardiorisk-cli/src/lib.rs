//! cardiorisk-cli library root.
//!
//! Re-exports the config and rendering modules so integration tests can
//! exercise them without going through the interactive commands.

pub mod config;
pub mod render;
