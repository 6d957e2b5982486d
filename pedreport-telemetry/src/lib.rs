//! # pedreport Telemetry
//!
//! Crate for logging setup shared by the pedreport binaries.

pub mod logging;

pub use logging::{level_for, EventLogger, LogSink};
