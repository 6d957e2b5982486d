//! Error types for settings loading and validation

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

use crate::method::MethodTag;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings, geometry or trajectory file not found.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Command line could not be interpreted.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Option validation error.
    #[error("Invalid configuration:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment parsing error.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] Box<figment::Error>),

    /// Writing options back out failed.
    #[error("Configuration serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// I/O error.
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Measurement area {0} is defined more than once")]
    DuplicateArea(i32),

    #[error("Measurement area {id} has {count} vertices, a polygon needs at least 3")]
    TooFewVertices { id: i32, count: usize },

    #[error("Measurement area {id} has a malformed coordinate: {detail}")]
    MalformedCoordinate { id: i32, detail: String },

    #[error("Measurement area {0} encloses no area")]
    DegenerateArea(i32),

    #[error("Method {0} is enabled but names no measurement area")]
    NoAreas(MethodTag),

    #[error("Method {method} references undefined measurement area {id}")]
    UnknownArea { method: MethodTag, id: i32 },

    #[error("Method {method} has {starts} start frames but {stops} stop frames")]
    FrameRangeMismatch {
        method: MethodTag,
        starts: usize,
        stops: usize,
    },

    #[error("Method {method} frame range {index} starts at {start} after it stops at {stop}")]
    FrameRangeOrder {
        method: MethodTag,
        index: usize,
        start: u32,
        stop: u32,
    },

    #[error("Method {method} has {count} time interval values, expected begin/end pairs")]
    TimeIntervalParity { method: MethodTag, count: usize },

    #[error("Method {method} has {flags} individual flags for {areas} measurement areas")]
    IndividualFlagMismatch {
        method: MethodTag,
        flags: usize,
        areas: usize,
    },
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (field, errors) in errors.field_errors() {
        let _ = writeln!(output, "Field '{}':", field);
        for error in errors {
            let message = match &error.message {
                Some(msg) => msg.to_string(),
                None => error.code.to_string(),
            };
            let _ = writeln!(output, "  - {}", message);
        }
    }
    output
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Parsing(Box::new(error))
    }
}
