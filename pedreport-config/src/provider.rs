//! Settings provider trait for loading the settings document from various sources.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Yaml},
    Figment,
};

use crate::ConfigError;

/// Prefix of environment variables that override settings values.
pub const ENV_PREFIX: &str = "PEDREPORT_";

/// Trait for loading the settings document from different sources.
pub trait SettingsProvider {
    /// Loads the settings and returns a Figment instance.
    fn load(&self) -> Result<Figment, ConfigError>;
}

/// Settings read from a YAML or JSON file, with `PEDREPORT_*` overrides.
///
/// `.json` files are read as JSON, everything else as YAML. Nested keys in
/// environment variables are separated by `__`, so
/// `PEDREPORT_OPTIONS__LOG_LEVEL=3` sets `options.log_level`.
#[derive(Debug, Clone)]
pub struct SettingsFileProvider {
    path: PathBuf,
}

impl SettingsFileProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl SettingsProvider for SettingsFileProvider {
    fn load(&self) -> Result<Figment, ConfigError> {
        if !self.path.is_file() {
            return Err(ConfigError::FileNotFound(self.path.clone()));
        }

        let figment = if self.is_json() {
            Figment::from(Json::file(&self.path))
        } else {
            Figment::from(Yaml::file(&self.path))
        };
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}
