//! Custom validation functions for settings.
//!
//! Field ranges live on the option structs; this module holds the checks that
//! span several fields or several sections of the document.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::ValidationError;

use crate::area::MeasurementArea;
use crate::method::{MethodBlock, MethodTag};
use crate::options::ScalarOptions;
use crate::ConfigError;

/// Clipping and profile parameters must be usable when their feature is on.
pub fn validate_feature_parameters(options: &ScalarOptions) -> Result<(), ValidationError> {
    if options.cut_by_circle {
        if !options.cut_radius.is_finite() || options.cut_radius <= 0.0 {
            return Err(ValidationError::new("invalid_cut_radius").with_message(Cow::Owned(
                format!(
                    "cut radius must be positive and finite when cut_by_circle is enabled, got {}",
                    options.cut_radius
                ),
            )));
        }
        if options.circle_edges < 3 {
            return Err(ValidationError::new("invalid_circle_edges").with_message(Cow::Owned(
                format!(
                    "circle needs at least 3 edges when cut_by_circle is enabled, got {}",
                    options.circle_edges
                ),
            )));
        }
    }

    if options.get_profile {
        if !options.steady_start.is_finite() || !options.steady_end.is_finite() {
            return Err(ValidationError::new("invalid_steady_window").with_message(Cow::Owned(
                format!(
                    "steady state window must be finite when get_profile is enabled, got {} to {}",
                    options.steady_start, options.steady_end
                ),
            )));
        }
        if options.steady_start > options.steady_end {
            return Err(ValidationError::new("invalid_steady_window").with_message(Cow::Owned(
                format!(
                    "steady state starts at {} after it ends at {}",
                    options.steady_start, options.steady_end
                ),
            )));
        }
    }
    Ok(())
}

/// Checks one enabled method block against itself and the area table.
pub(crate) fn check_method(
    method: MethodTag,
    block: &MethodBlock,
    areas: &BTreeMap<i32, MeasurementArea>,
) -> Result<(), ConfigError> {
    if let Some(&id) = block
        .measurement_areas
        .iter()
        .find(|id| !areas.contains_key(*id))
    {
        return Err(ConfigError::UnknownArea { method, id });
    }

    if block.start_frames.len() != block.stop_frames.len() {
        return Err(ConfigError::FrameRangeMismatch {
            method,
            starts: block.start_frames.len(),
            stops: block.stop_frames.len(),
        });
    }

    for (index, pair) in block
        .start_frames
        .iter()
        .zip(&block.stop_frames)
        .enumerate()
    {
        if let (Some(start), Some(stop)) = pair {
            if start > stop {
                return Err(ConfigError::FrameRangeOrder {
                    method,
                    index,
                    start: *start,
                    stop: *stop,
                });
            }
        }
    }

    if block.time_intervals.len() % 2 != 0 {
        return Err(ConfigError::TimeIntervalParity {
            method,
            count: block.time_intervals.len(),
        });
    }

    if !block.individual_fd.is_empty()
        && block.individual_fd.len() != block.measurement_areas.len()
    {
        return Err(ConfigError::IndividualFlagMismatch {
            method,
            flags: block.individual_fd.len(),
            areas: block.measurement_areas.len(),
        });
    }

    if block.measurement_areas.is_empty() {
        return Err(ConfigError::NoAreas(method));
    }
    Ok(())
}
