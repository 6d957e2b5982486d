//! # pedreport Configuration
//!
//! Run configuration for pedestrian trajectory analysis.
//!
//! ## Features
//! - **Single source of truth**: one [`ConfigurationStore`] per run, read-only once loaded
//! - **Validation**: option ranges, area geometry and method cross references are checked up front
//! - **Measurement areas**: polygons and measurement lines keyed by ID, backed by `geo`
//! - **Overrides**: command-line flags and `PEDREPORT_*` environment variables
//!
//! ```no_run
//! use pedreport_config::{ArgsOutcome, ConfigurationStore, MethodTag};
//!
//! let mut store = ConfigurationStore::new();
//! match store.parse_args(std::env::args_os()) {
//!     Ok(ArgsOutcome::Ready) => {
//!         for id in store.area_ids(MethodTag::D) {
//!             let area = store.measurement_area(*id).expect("validated reference");
//!             println!("area {} covers {} m²", id, area.area());
//!         }
//!     }
//!     Ok(ArgsOutcome::Usage(text)) => println!("{text}"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod area;
mod args;
mod error;
mod method;
mod options;
mod provider;
mod settings;
mod store;
mod validation;

pub use area::{AreaBlock, AreaKind, AreaShape, MeasurementArea, Vertex};
pub use args::{ArgsOutcome, ReportArgs};
pub use error::ConfigError;
pub use method::{MethodBlock, MethodSelection, MethodTag};
pub use options::{FileFormat, ScalarOptions, VelocityComponent, UNSET};
pub use provider::{SettingsFileProvider, SettingsProvider, ENV_PREFIX};
pub use settings::{OutputSection, SettingsFile, TrajectorySection};
pub use store::{ConfigurationStore, StoreState};
