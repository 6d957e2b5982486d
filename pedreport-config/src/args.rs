//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Command‑line arguments for a pedreport run.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pedreport",
    version,
    about = "Pedestrian trajectory analysis",
    arg_required_else_help = true
)]
pub struct ReportArgs {
    /// Settings file (YAML, or JSON with a .json extension)
    pub settings: PathBuf,

    /// Resolve relative paths against this directory instead of the settings file's
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Write the log to this file instead of the one named in the settings
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Result of a successful argument parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsOutcome {
    /// Settings were loaded and validated.
    Ready,
    /// Help or version output was requested, or no arguments were given.
    Usage(String),
}
