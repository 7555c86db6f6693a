//! System-level modules
//!
//! - Logging initialization
//! - Server lifecycle (startup, serve)

pub mod logging;
pub mod startup;
