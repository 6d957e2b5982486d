use std::path::PathBuf;

use pedreport_config::ConfigError;
use thiserror::Error;

/// Reasons a configured run cannot start.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Geometry file not found: {0}")]
    MissingGeometry(PathBuf),

    #[error("No trajectory files found in {0}")]
    NoTrajectories(PathBuf),

    #[error("Could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
