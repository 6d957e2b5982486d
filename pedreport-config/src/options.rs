//! Global scalar options.
//!
//! Grid sizes, circular clipping, the steady-state window, velocity handling
//! and log verbosity. Every option has a default so an absent `options`
//! section is valid; numeric parameters that only matter when a feature is
//! switched on default to `-1`, meaning unset.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{validation, ConfigError};

/// Trajectory file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Unspecified,
    Xml,
    Txt,
}

impl FileFormat {
    /// File extensions accepted when scanning a trajectory directory.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileFormat::Unspecified => &["txt", "xml"],
            FileFormat::Xml => &["xml"],
            FileFormat::Txt => &["txt"],
        }
    }
}

/// Velocity component used by the analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityComponent {
    /// Full planar velocity.
    #[default]
    #[serde(alias = "b")]
    B,
    #[serde(alias = "x")]
    X,
    #[serde(alias = "y")]
    Y,
}

/// Scalar options of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
#[validate(schema(function = validation::validate_feature_parameters))]
pub struct ScalarOptions {
    /// Profile grid cell width.
    #[validate(range(exclusive_min = 0.0))]
    pub grid_size_x: f32,

    /// Profile grid cell height.
    #[validate(range(exclusive_min = 0.0))]
    pub grid_size_y: f32,

    /// Clip Voronoi cells by a circle around each pedestrian.
    pub cut_by_circle: bool,

    /// Clipping circle radius.
    pub cut_radius: f64,

    /// Number of edges approximating the clipping circle.
    pub circle_edges: i32,

    /// Start of the steady-state window (seconds).
    pub steady_start: f64,

    /// End of the steady-state window (seconds).
    pub steady_end: f64,

    pub velocity_component: VelocityComponent,

    pub ignore_backward_movement: bool,

    /// Frame offset used for instantaneous velocity.
    #[validate(range(min = 1))]
    pub frame_step: u32,

    /// Verbosity from 0 (errors only) to 4 (trace).
    #[validate(range(min = 0, max = 4))]
    pub log_level: i32,

    pub one_dimensional: bool,

    /// Generate density/velocity profiles over the steady-state window.
    pub get_profile: bool,

    /// Write Voronoi cell graphs.
    pub output_graph: bool,
}

pub const UNSET: i32 = -1;

impl Default for ScalarOptions {
    fn default() -> Self {
        Self {
            grid_size_x: 0.10,
            grid_size_y: 0.10,
            cut_by_circle: false,
            cut_radius: f64::from(UNSET),
            circle_edges: UNSET,
            steady_start: f64::from(UNSET),
            steady_end: f64::from(UNSET),
            velocity_component: VelocityComponent::default(),
            ignore_backward_movement: false,
            frame_step: 10,
            log_level: 2,
            one_dimensional: false,
            get_profile: false,
            output_graph: false,
        }
    }
}

#[derive(Serialize)]
struct OptionsSection<'a> {
    options: &'a ScalarOptions,
}

impl ScalarOptions {
    /// Renders the options as an `options:` settings section.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(&OptionsSection { options: self })?)
    }
}
