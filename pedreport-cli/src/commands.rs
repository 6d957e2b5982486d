use std::path::Path;

use pedreport_config::{ConfigurationStore, MeasurementArea, MethodTag};
use pedreport_telemetry::EventLogger;
use tracing::{info, warn};

use crate::error::ReportError;

/// Switches logging to the configured verbosity and error log file.
pub fn apply_logging(
    logger: Option<&EventLogger>,
    store: &ConfigurationStore,
) -> Result<(), ReportError> {
    let Some(logger) = logger else {
        return Ok(());
    };
    logger
        .configure(store.log_level(), store.error_log_file())
        .map_err(|source| ReportError::LogFile {
            path: store
                .error_log_file()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            source,
        })
}

/// Checks the inputs the analysis cannot run without.
pub fn check_inputs(store: &ConfigurationStore) -> Result<(), ReportError> {
    if !store.geometry_file().is_file() {
        return Err(ReportError::MissingGeometry(
            store.geometry_file().to_path_buf(),
        ));
    }
    if store.trajectories_files().is_empty() {
        return Err(ReportError::NoTrajectories(
            store.trajectories_location().to_path_buf(),
        ));
    }
    Ok(())
}

fn describe_area(area: &MeasurementArea) -> String {
    match area.line() {
        Some(_) => format!("area {} line, length {:.2}", area.id(), area.line_length()),
        None => format!("area {} polygon, {:.2} m²", area.id(), area.area()),
    }
}

/// One line per enabled method and the measurement areas it uses.
pub fn summarize(store: &ConfigurationStore) -> Vec<String> {
    let mut lines = Vec::new();
    for tag in store.enabled_methods() {
        let areas: Vec<String> = store
            .area_ids(tag)
            .iter()
            .filter_map(|id| store.measurement_area(*id))
            .map(describe_area)
            .collect();
        lines.push(format!("method {}: {}", tag, areas.join("; ")));
    }
    lines
}

pub fn run(store: &ConfigurationStore) -> Result<(), ReportError> {
    check_inputs(store)?;
    info!(
        trajectories = store.trajectories_files().len(),
        output = %store.output_dir().display(),
        "configuration ready"
    );
    if store.enabled_methods().next().is_none() {
        warn!("no analysis method is enabled");
    }
    if store.is_method(MethodTag::D) && store.is_get_profile() {
        info!(
            steady_start = store.steady_start(),
            steady_end = store.steady_end(),
            "profiles requested"
        );
    }
    for line in summarize(store) {
        println!("{line}");
    }
    Ok(())
}
