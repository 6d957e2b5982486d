//! Settings document layout.
//!
//! Mirrors the sections of the settings file one to one. Nothing here is
//! validated; [`crate::ConfigurationStore`] turns a document into a checked
//! run configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::area::AreaBlock;
use crate::method::{MethodBlock, MethodTag};
use crate::options::{FileFormat, ScalarOptions};

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Geometry file, relative to the project root unless absolute.
    pub geometry: Option<PathBuf>,

    pub trajectories: TrajectorySection,

    pub output: OutputSection,

    pub measurement_areas: Vec<AreaBlock>,

    /// One optional block per analysis method.
    pub methods: BTreeMap<MethodTag, MethodBlock>,

    pub options: ScalarOptions,
}

/// Where trajectories are read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrajectorySection {
    pub format: FileFormat,

    /// Directory holding the trajectory files; defaults to the project root.
    pub location: Option<PathBuf>,

    /// File names inside `location`. Empty means every file of the format.
    pub files: Vec<PathBuf>,
}

/// Where results and logs are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Output directory; defaults to `<project root>/Output`.
    pub location: Option<PathBuf>,

    /// Error log file. Without one, logs stay on stderr.
    pub log_file: Option<PathBuf>,
}
