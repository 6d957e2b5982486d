//! ## pedreport-cli
//! **Entry point of the pedestrian trajectory analysis**
//!
//! Loads the run configuration named on the command line, routes logging to
//! the configured error log and checks that the inputs exist.

use std::process::ExitCode;

use pedreport_config::{ArgsOutcome, ConfigurationStore};
use pedreport_telemetry::EventLogger;
use tracing::error;

mod commands;
mod error;

fn main() -> ExitCode {
    let logger = EventLogger::init();
    let mut store = ConfigurationStore::new();

    match store.parse_args(std::env::args_os()) {
        Ok(ArgsOutcome::Ready) => {}
        Ok(ArgsOutcome::Usage(text)) => {
            println!("{text}");
            return ExitCode::FAILURE;
        }
        // already logged by the store
        Err(_) => return ExitCode::FAILURE,
    }

    let result =
        commands::apply_logging(logger.as_ref(), &store).and_then(|()| commands::run(&store));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "cannot start analysis");
            ExitCode::FAILURE
        }
    }
}
