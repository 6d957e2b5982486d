//! The configuration store.
//!
//! [`ConfigurationStore`] moves through `Unconfigured -> FileLocated -> Ready`.
//! Any failure leaves it `Failed`. A run configuration is assembled off to the
//! side and only replaces the current one once every check has passed, so a
//! failed parse never exposes partially populated state.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::area::{build_area_table, MeasurementArea};
use crate::args::{ArgsOutcome, ReportArgs};
use crate::method::{MethodSelection, MethodTag};
use crate::options::{FileFormat, ScalarOptions, VelocityComponent};
use crate::provider::{SettingsFileProvider, SettingsProvider};
use crate::settings::{SettingsFile, TrajectorySection};
use crate::validation::check_method;
use crate::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreState {
    #[default]
    Unconfigured,
    FileLocated,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Default)]
struct RunConfig {
    geometry_file: PathBuf,
    trajectories_location: PathBuf,
    trajectories_files: Vec<PathBuf>,
    output_dir: PathBuf,
    error_log_file: Option<PathBuf>,
    project_root: PathBuf,
    file_format: FileFormat,
    options: ScalarOptions,
    methods: BTreeMap<MethodTag, MethodSelection>,
    areas: BTreeMap<i32, MeasurementArea>,
}

/// Loads, validates and serves the configuration of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationStore {
    state: StoreState,
    project_root_override: Option<PathBuf>,
    log_file_override: Option<PathBuf>,
    config: RunConfig,
}

fn resolve(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    Ok(path.canonicalize()?)
}

/// Lists the trajectory files named in the section, or scans `location` for
/// files of the configured format when none are named.
fn collect_trajectories(
    location: &Path,
    section: &TrajectorySection,
) -> Result<Vec<PathBuf>, ConfigError> {
    if !section.files.is_empty() {
        return section
            .files
            .iter()
            .map(|name| {
                let path = location.join(name);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(ConfigError::FileNotFound(path))
                }
            })
            .collect();
    }

    if !location.is_dir() {
        warn!(location = %location.display(), "trajectory location is not a directory");
        return Ok(Vec::new());
    }

    let extensions = section.format.extensions();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(location)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

impl RunConfig {
    fn build(
        provider: &dyn SettingsProvider,
        project_root: PathBuf,
        log_file_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let settings: SettingsFile = provider.load()?.extract()?;
        settings.options.validate()?;

        let areas = build_area_table(settings.measurement_areas)?;

        let mut methods = BTreeMap::new();
        for (tag, block) in settings.methods {
            if !block.enabled {
                debug!(method = %tag, "method block disabled");
                continue;
            }
            check_method(tag, &block, &areas)?;
            methods.insert(tag, MethodSelection::from_block(block));
        }

        let root = project_root.as_path();
        let geometry_file = settings
            .geometry
            .map(|p| resolve(root, p))
            .unwrap_or_default();
        let trajectories_location = settings
            .trajectories
            .location
            .clone()
            .map_or_else(|| root.to_path_buf(), |p| resolve(root, p));
        let trajectories_files = collect_trajectories(&trajectories_location, &settings.trajectories)?;
        let output_dir = settings
            .output
            .location
            .map_or_else(|| root.join("Output"), |p| resolve(root, p));
        let error_log_file =
            log_file_override.or_else(|| settings.output.log_file.map(|p| resolve(root, p)));

        Ok(Self {
            geometry_file,
            trajectories_location,
            trajectories_files,
            output_dir,
            error_log_file,
            project_root,
            file_format: settings.trajectories.format,
            options: settings.options,
            methods,
            areas,
        })
    }

    fn log_summary(&self) {
        info!(project_root = %self.project_root.display(), "project root");
        info!(geometry = %self.geometry_file.display(), "geometry file");
        info!(
            location = %self.trajectories_location.display(),
            files = self.trajectories_files.len(),
            format = ?self.file_format,
            "trajectories"
        );
        info!(output = %self.output_dir.display(), "output directory");
        for (id, area) in &self.areas {
            info!(id, line = area.is_line(), area = area.area(), "measurement area");
        }
        for (tag, method) in &self.methods {
            info!(method = %tag, areas = ?method.area_ids(), "method enabled");
        }
        debug!(options = ?self.options, "scalar options");
    }
}

impl ConfigurationStore {
    /// An unconfigured store holding default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// `true` once a settings file has been loaded and validated.
    pub fn is_ready(&self) -> bool {
        self.state == StoreState::Ready
    }

    fn fail(&mut self, err: ConfigError) -> ConfigError {
        self.state = StoreState::Failed;
        error!(error = %err, "configuration unusable");
        err
    }

    /// Parses process arguments and, when a settings file is named, loads it.
    ///
    /// Help, version or an empty argument list yield [`ArgsOutcome::Usage`]
    /// with the rendered text; the caller prints it and stops.
    pub fn parse_args<I, T>(&mut self, args: I) -> Result<ArgsOutcome, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = match ReportArgs::try_parse_from(args) {
            Ok(args) => args,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    | ErrorKind::DisplayVersion => Ok(ArgsOutcome::Usage(err.render().to_string())),
                    _ => Err(self.fail(ConfigError::InvalidArguments(err.render().to_string()))),
                };
            }
        };

        // overrides apply to this call only
        self.project_root_override = None;
        self.log_file_override = args.log_file;
        if let Some(root) = args.project_root {
            self.project_root_override = Some(absolute(&root).map_err(|e| self.fail(e))?);
        }

        self.parse_ini_file(&args.settings)?;
        Ok(ArgsOutcome::Ready)
    }

    /// Loads and validates a settings file.
    ///
    /// Relative paths inside the file resolve against the project root, which
    /// is the file's directory unless overridden on the command line.
    pub fn parse_ini_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = absolute(path.as_ref()).map_err(|e| self.fail(e))?;
        self.state = StoreState::FileLocated;
        info!(settings = %path.display(), "reading settings");

        let project_root = match &self.project_root_override {
            Some(root) => root.clone(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        self.parse_with(&SettingsFileProvider::new(&path), project_root)
    }

    /// Loads settings from any provider, resolving paths against `project_root`.
    pub fn parse_with(
        &mut self,
        provider: &dyn SettingsProvider,
        project_root: PathBuf,
    ) -> Result<(), ConfigError> {
        match RunConfig::build(provider, project_root, self.log_file_override.clone()) {
            Ok(config) => {
                config.log_summary();
                self.config = config;
                self.state = StoreState::Ready;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Absolute geometry file path; empty when the settings name none.
    pub fn geometry_file(&self) -> &Path {
        &self.config.geometry_file
    }

    /// Directory holding the trajectory files.
    pub fn trajectories_location(&self) -> &Path {
        &self.config.trajectories_location
    }

    /// Full paths of the trajectory files, sorted when found by scanning.
    pub fn trajectories_files(&self) -> &[PathBuf] {
        &self.config.trajectories_files
    }

    /// Trajectory file names without their directory.
    pub fn trajectories_file_names(&self) -> impl Iterator<Item = &OsStr> + '_ {
        self.config
            .trajectories_files
            .iter()
            .filter_map(|path| path.file_name())
    }

    /// Output directory, `<project root>/Output` unless configured.
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// `None` when logs go to stderr.
    pub fn error_log_file(&self) -> Option<&Path> {
        self.config.error_log_file.as_deref()
    }

    /// Directory that relative paths in the settings resolve against.
    pub fn project_root(&self) -> &Path {
        &self.config.project_root
    }

    /// Trajectory file format.
    pub fn file_format(&self) -> FileFormat {
        self.config.file_format
    }

    /// All scalar options at once.
    pub fn options(&self) -> &ScalarOptions {
        &self.config.options
    }

    /// The selection of an enabled method.
    pub fn method(&self, tag: MethodTag) -> Option<&MethodSelection> {
        self.config.methods.get(&tag)
    }

    /// `true` when the settings carry an enabled block for `tag`.
    pub fn is_method(&self, tag: MethodTag) -> bool {
        self.method(tag).is_some_and(MethodSelection::is_enabled)
    }

    /// Enabled methods in `A, B, C, D, I, J` order.
    pub fn enabled_methods(&self) -> impl Iterator<Item = MethodTag> + '_ {
        self.config.methods.keys().copied()
    }

    /// Measurement area IDs of a method; empty when it is disabled.
    pub fn area_ids(&self, tag: MethodTag) -> &[i32] {
        self.method(tag)
            .map(MethodSelection::area_ids)
            .unwrap_or_default()
    }

    /// Window start frames of a method; `None` is an open bound.
    pub fn start_frames(&self, tag: MethodTag) -> &[Option<u32>] {
        self.method(tag)
            .map(MethodSelection::start_frames)
            .unwrap_or_default()
    }

    /// Window stop frames of a method; `None` is an open bound.
    pub fn stop_frames(&self, tag: MethodTag) -> &[Option<u32>] {
        self.method(tag)
            .map(MethodSelection::stop_frames)
            .unwrap_or_default()
    }

    /// Method A time intervals as a flat list of begin/end pairs.
    pub fn time_intervals_a(&self) -> &[u32] {
        self.method(MethodTag::A)
            .map(MethodSelection::time_intervals)
            .unwrap_or_default()
    }

    pub fn plot_time_series(&self, tag: MethodTag) -> bool {
        self.method(tag).is_some_and(MethodSelection::plot_time_series)
    }

    /// Individual flow/density flags, one per method D measurement area.
    pub fn individual_fd_flags(&self) -> &[bool] {
        self.method(MethodTag::D)
            .map(MethodSelection::individual_fd)
            .unwrap_or_default()
    }

    /// IDs of the method D areas with individual flow/density output.
    pub fn individual_fd_areas(&self) -> impl Iterator<Item = i32> + '_ {
        self.area_ids(MethodTag::D)
            .iter()
            .zip(self.individual_fd_flags())
            .filter_map(|(&id, &flag)| flag.then_some(id))
    }

    /// `true` when any method D area writes individual flow/density output.
    pub fn is_individual_fd(&self) -> bool {
        self.individual_fd_flags().iter().any(|&flag| flag)
    }

    /// Looks up a measurement area by ID.
    pub fn measurement_area(&self, id: i32) -> Option<&MeasurementArea> {
        self.config.areas.get(&id)
    }

    /// All measurement areas in ID order.
    pub fn measurement_areas(&self) -> impl Iterator<Item = &MeasurementArea> + '_ {
        self.config.areas.values()
    }

    /// Profile grid cell width, 0.10 by default.
    pub fn grid_size_x(&self) -> f32 {
        self.config.options.grid_size_x
    }

    /// Profile grid cell height, 0.10 by default.
    pub fn grid_size_y(&self) -> f32 {
        self.config.options.grid_size_y
    }

    pub fn is_cut_by_circle(&self) -> bool {
        self.config.options.cut_by_circle
    }

    /// Clipping circle radius; `-1` when unset, positive whenever clipping is on.
    pub fn cut_radius(&self) -> f64 {
        self.config.options.cut_radius
    }

    /// Edges of the clipping circle; `-1` when unset, at least 3 whenever clipping is on.
    pub fn circle_edges(&self) -> i32 {
        self.config.options.circle_edges
    }

    /// Steady-state window start in seconds; `-1` when unset.
    pub fn steady_start(&self) -> f64 {
        self.config.options.steady_start
    }

    /// Steady-state window end in seconds; `-1` when unset.
    pub fn steady_end(&self) -> f64 {
        self.config.options.steady_end
    }

    /// Velocity component, `B` (both axes) by default.
    pub fn velocity_component(&self) -> VelocityComponent {
        self.config.options.velocity_component
    }

    pub fn ignore_backward_movement(&self) -> bool {
        self.config.options.ignore_backward_movement
    }

    /// Frame offset for instantaneous velocity, 10 by default.
    pub fn frame_step(&self) -> u32 {
        self.config.options.frame_step
    }

    /// Verbosity from 0 to 4, 2 (info) by default.
    pub fn log_level(&self) -> i32 {
        self.config.options.log_level
    }

    pub fn is_one_dimensional(&self) -> bool {
        self.config.options.one_dimensional
    }

    pub fn is_get_profile(&self) -> bool {
        self.config.options.get_profile
    }

    pub fn is_output_graph(&self) -> bool {
        self.config.options.output_graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use figment::Jail;
    use tracing_test::traced_test;

    const AREAS: &str = r#"
measurement_areas:
  - id: 1
    type: bounding_box
    vertices:
      - {x: -2.25, y: 0.0}
      - {x: 2.25, y: 0.0}
      - {x: 2.25, y: -2.0}
      - {x: -2.25, y: -2.0}
    length_in_movement_direction: 1.0
  - id: 2
    type: line
    start: {x: -2.25, y: 0.0}
    end: {x: 4.0, y: 0.0}
"#;

    fn write_settings(jail: &mut Jail, name: &str, body: &str) -> figment::error::Result<()> {
        jail.create_file(name, &format!("geometry: geo.xml\n{AREAS}{body}"))?;
        Ok(())
    }

    fn load(path: &str) -> Result<ConfigurationStore, ConfigError> {
        let mut store = ConfigurationStore::new();
        store.parse_ini_file(path)?;
        Ok(store)
    }

    #[test]
    fn full_document() {
        Jail::expect_with(|jail| {
            jail.create_file("run_01.txt", "")?;
            jail.create_file("run_02.txt", "")?;
            jail.create_file("notes.md", "")?;
            write_settings(
                jail,
                "settings.yaml",
                r#"
trajectories:
  format: txt
methods:
  A:
    measurement_areas: [2]
    time_intervals: [0, 100, 100, 200]
    plot_time_series: true
  C:
    measurement_areas: [1]
  D:
    measurement_areas: [1, 2]
    start_frames: [10, None]
    stop_frames: [400, ~]
    individual_fd: [true, false]
options:
  cut_by_circle: true
  cut_radius: 1.0
  circle_edges: 10
  velocity_component: X
"#,
            )?;

            let store = load("settings.yaml").map_err(|e| e.to_string())?;
            let root = jail.directory().canonicalize().map_err(|e| e.to_string())?;

            assert!(store.is_ready());
            assert_eq!(store.project_root(), root.as_path());
            assert_eq!(store.geometry_file(), root.join("geo.xml"));
            assert_eq!(store.output_dir(), root.join("Output"));
            assert_eq!(
                store.trajectories_files(),
                &[root.join("run_01.txt"), root.join("run_02.txt")]
            );
            assert_eq!(store.file_format(), FileFormat::Txt);
            assert_eq!(store.error_log_file(), None);

            assert!(store.is_method(MethodTag::A));
            assert!(!store.is_method(MethodTag::B));
            assert_eq!(store.area_ids(MethodTag::D), &[1, 2]);
            assert_eq!(store.start_frames(MethodTag::D), &[Some(10), None]);
            assert_eq!(store.stop_frames(MethodTag::D), &[Some(400), None]);
            assert_eq!(store.time_intervals_a(), &[0, 100, 100, 200]);
            assert!(store.plot_time_series(MethodTag::A));
            assert_eq!(store.individual_fd_flags(), &[true, false]);
            assert_eq!(store.individual_fd_areas().collect::<Vec<_>>(), vec![1]);
            assert_eq!(
                store.trajectories_file_names().collect::<Vec<_>>(),
                vec![OsStr::new("run_01.txt"), OsStr::new("run_02.txt")]
            );
            assert!(store.is_individual_fd());
            assert_eq!(
                store.enabled_methods().collect::<Vec<_>>(),
                vec![MethodTag::A, MethodTag::C, MethodTag::D]
            );

            assert!(store.is_cut_by_circle());
            assert_relative_eq!(store.cut_radius(), 1.0);
            assert_eq!(store.circle_edges(), 10);
            assert_eq!(store.velocity_component(), VelocityComponent::X);
            assert_eq!(store.frame_step(), 10);
            assert_eq!(store.log_level(), 2);

            let area = store.measurement_area(1).expect("area 1");
            assert_relative_eq!(area.area(), 9.0);
            assert!(store.measurement_area(2).is_some_and(MeasurementArea::is_line));
            assert!(store.measurement_area(3).is_none());
            Ok(())
        });
    }

    #[test]
    fn absent_method_block() {
        Jail::expect_with(|jail| {
            write_settings(jail, "settings.yaml", "methods:\n  C: {measurement_areas: [1]}\n")?;
            let store = load("settings.yaml").map_err(|e| e.to_string())?;
            assert!(!store.is_method(MethodTag::B));
            assert!(store.area_ids(MethodTag::B).is_empty());
            assert!(store.start_frames(MethodTag::B).is_empty());
            assert!(store.individual_fd_flags().is_empty());
            Ok(())
        });
    }

    #[test]
    fn disabled_block_is_ignored() {
        Jail::expect_with(|jail| {
            write_settings(
                jail,
                "settings.yaml",
                "methods:\n  J: {enabled: false, measurement_areas: [99]}\n",
            )?;
            let store = load("settings.yaml").map_err(|e| e.to_string())?;
            assert!(!store.is_method(MethodTag::J));
            assert!(store.area_ids(MethodTag::J).is_empty());
            Ok(())
        });
    }

    #[traced_test]
    #[test]
    fn dangling_area_leaves_no_partial_state() {
        Jail::expect_with(|jail| {
            write_settings(jail, "good.yaml", "methods:\n  C: {measurement_areas: [1]}\n")?;
            write_settings(
                jail,
                "bad.yaml",
                "methods:\n  B: {measurement_areas: [1]}\n  C: {measurement_areas: [7]}\n",
            )?;

            let mut store = load("good.yaml").map_err(|e| e.to_string())?;
            let err = store.parse_ini_file("bad.yaml").unwrap_err();
            assert!(matches!(
                err,
                ConfigError::UnknownArea {
                    method: MethodTag::C,
                    id: 7
                }
            ));
            assert_eq!(store.state(), StoreState::Failed);
            assert!(!store.is_method(MethodTag::B));
            assert_eq!(store.area_ids(MethodTag::C), &[1]);
            Ok(())
        });
        assert!(logs_contain("references undefined measurement area 7"));
    }

    #[test]
    fn two_point_polygon_fails() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "settings.yaml",
                "measurement_areas:\n  - id: 4\n    vertices: [{x: 0, y: 0}, {x: 1, y: 1}]\n",
            )?;
            let err = load("settings.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::TooFewVertices { id: 4, count: 2 }));
            Ok(())
        });
    }

    #[test]
    fn duplicate_area_fails() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "settings.yaml",
                "measurement_areas:\n  - {id: 2, type: line, start: {x: 0, y: 0}, end: {x: 1, y: 0}}\n  - {id: 2, type: line, start: {x: 0, y: 1}, end: {x: 1, y: 1}}\n",
            )?;
            assert!(matches!(
                load("settings.yaml"),
                Err(ConfigError::DuplicateArea(2))
            ));
            Ok(())
        });
    }

    #[test]
    fn mismatched_frames_for_method_d() {
        Jail::expect_with(|jail| {
            write_settings(
                jail,
                "settings.yaml",
                "methods:\n  D:\n    measurement_areas: [1]\n    start_frames: [0, 50]\n    stop_frames: [100]\n",
            )?;
            assert!(matches!(
                load("settings.yaml"),
                Err(ConfigError::FrameRangeMismatch {
                    method: MethodTag::D,
                    ..
                })
            ));
            Ok(())
        });
    }

    #[test]
    fn misspelled_keys_fail() {
        Jail::expect_with(|jail| {
            write_settings(
                jail,
                "method.yaml",
                "methods:\n  D: {measurment_areas: [1]}\n",
            )?;
            let mut store = ConfigurationStore::new();
            let err = store.parse_ini_file("method.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Parsing(_)));
            assert!(err.to_string().contains("measurment_areas"), "{err}");
            assert!(!store.is_method(MethodTag::D));

            write_settings(jail, "option.yaml", "options:\n  cut_radus: 1.0\n")?;
            assert!(matches!(load("option.yaml"), Err(ConfigError::Parsing(_))));

            write_settings(jail, "empty.yaml", "methods:\n  D: {}\n")?;
            assert!(matches!(
                load("empty.yaml"),
                Err(ConfigError::NoAreas(MethodTag::D))
            ));
            Ok(())
        });
    }

    #[test]
    fn non_finite_options_fail() {
        Jail::expect_with(|jail| {
            write_settings(
                jail,
                "radius.yaml",
                "options:\n  cut_by_circle: true\n  cut_radius: .inf\n  circle_edges: 10\n",
            )?;
            let err = load("radius.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));

            write_settings(
                jail,
                "steady.yaml",
                "options:\n  get_profile: true\n  steady_start: .nan\n  steady_end: 5\n",
            )?;
            let err = load("steady.yaml").unwrap_err();
            assert!(err.to_string().contains("steady state window must be finite"), "{err}");
            Ok(())
        });
    }

    #[test]
    fn negative_cut_radius_with_clipping() {
        Jail::expect_with(|jail| {
            write_settings(
                jail,
                "settings.yaml",
                "options:\n  cut_by_circle: true\n  cut_radius: -1\n  circle_edges: 10\n",
            )?;
            let err = load("settings.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("cut radius"));
            Ok(())
        });
    }

    #[test]
    fn missing_and_malformed_files() {
        Jail::expect_with(|jail| {
            let mut store = ConfigurationStore::new();
            assert!(matches!(
                store.parse_ini_file("nope.yaml"),
                Err(ConfigError::FileNotFound(_))
            ));
            assert_eq!(store.state(), StoreState::Failed);

            jail.create_file("broken.yaml", "methods: [A, B\n")?;
            assert!(matches!(
                load("broken.yaml"),
                Err(ConfigError::Parsing(_))
            ));

            jail.create_file("empty_block.yaml", "methods:\n  C:\n")?;
            let err = load("empty_block.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Parsing(_)));
            assert!(err.to_string().contains("empty_block.yaml"), "{err}");
            Ok(())
        });
    }

    #[test]
    fn options_round_trip() {
        Jail::expect_with(|jail| {
            write_settings(
                jail,
                "first.yaml",
                r#"
options:
  grid_size_x: 0.25
  grid_size_y: 0.5
  cut_by_circle: true
  cut_radius: 0.8
  circle_edges: 12
  steady_start: 120.5
  steady_end: 480
  velocity_component: Y
  ignore_backward_movement: true
  frame_step: 4
  log_level: 3
  one_dimensional: true
  get_profile: true
  output_graph: true
"#,
            )?;
            let first = load("first.yaml").map_err(|e| e.to_string())?;
            let yaml = first.options().to_yaml().map_err(|e| e.to_string())?;
            write_settings(jail, "second.yaml", &yaml)?;
            let second = load("second.yaml").map_err(|e| e.to_string())?;

            assert_eq!(first.options(), second.options());
            assert_eq!(second.grid_size_y(), 0.5);
            assert_eq!(second.circle_edges(), 12);
            assert_relative_eq!(second.steady_start(), 120.5);
            assert!(second.is_get_profile());
            assert!(second.is_output_graph());
            assert!(second.is_one_dimensional());
            assert!(second.ignore_backward_movement());
            Ok(())
        });
    }

    #[test]
    fn listed_trajectory_must_exist() {
        Jail::expect_with(|jail| {
            std::fs::create_dir("traj").map_err(|e| e.to_string())?;
            jail.create_file("traj/a.xml", "")?;
            write_settings(
                jail,
                "settings.yaml",
                "trajectories:\n  format: xml\n  location: traj\n  files: [a.xml, b.xml]\n",
            )?;
            match load("settings.yaml") {
                Err(ConfigError::FileNotFound(path)) => assert!(path.ends_with("traj/b.xml")),
                other => panic!("expected FileNotFound, got {:?}", other.map(|_| ())),
            }
            Ok(())
        });
    }

    #[test]
    fn args_drive_the_store() {
        Jail::expect_with(|jail| {
            std::fs::create_dir("project").map_err(|e| e.to_string())?;
            jail.create_file("project/walk.xml", "")?;
            write_settings(
                jail,
                "settings.yaml",
                "output:\n  log_file: from_settings.log\n",
            )?;

            let mut store = ConfigurationStore::new();
            let outcome = store
                .parse_args(["pedreport", "settings.yaml", "--project-root", "project"])
                .map_err(|e| e.to_string())?;
            assert_eq!(outcome, ArgsOutcome::Ready);

            let root = jail.directory().join("project").canonicalize().map_err(|e| e.to_string())?;
            assert_eq!(store.project_root(), root.as_path());
            assert_eq!(store.trajectories_files(), &[root.join("walk.xml")]);
            assert_eq!(store.error_log_file(), Some(root.join("from_settings.log").as_path()));

            let mut store = ConfigurationStore::new();
            store
                .parse_args(["pedreport", "settings.yaml", "--log-file", "cli.log"])
                .map_err(|e| e.to_string())?;
            assert_eq!(store.error_log_file(), Some(Path::new("cli.log")));
            Ok(())
        });
    }

    #[test]
    fn overrides_do_not_outlive_their_call() {
        Jail::expect_with(|jail| {
            std::fs::create_dir("other").map_err(|e| e.to_string())?;
            write_settings(jail, "settings.yaml", "")?;
            let jail_root = jail.directory().canonicalize().map_err(|e| e.to_string())?;

            let mut store = ConfigurationStore::new();
            store
                .parse_args([
                    "pedreport",
                    "settings.yaml",
                    "--project-root",
                    "other",
                    "--log-file",
                    "cli.log",
                ])
                .map_err(|e| e.to_string())?;
            assert_eq!(store.project_root(), jail_root.join("other").as_path());

            store
                .parse_args(["pedreport", "settings.yaml"])
                .map_err(|e| e.to_string())?;
            assert_eq!(store.project_root(), jail_root.as_path());
            assert_eq!(store.error_log_file(), None);
            Ok(())
        });
    }

    #[test]
    fn usage_is_not_an_error() {
        let mut store = ConfigurationStore::new();
        match store.parse_args(["pedreport"]) {
            Ok(ArgsOutcome::Usage(text)) => assert!(text.contains("Usage")),
            other => panic!("expected usage, got {:?}", other),
        }
        assert_eq!(store.state(), StoreState::Unconfigured);

        let mut store = ConfigurationStore::new();
        assert!(matches!(
            store.parse_args(["pedreport", "--help"]),
            Ok(ArgsOutcome::Usage(_))
        ));

        let mut store = ConfigurationStore::new();
        assert!(matches!(
            store.parse_args(["pedreport", "--bogus", "x.yaml"]),
            Err(ConfigError::InvalidArguments(_))
        ));
    }

    #[test]
    fn ready_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigurationStore>();
    }
}
