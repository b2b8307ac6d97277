//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::HolidayTable;

use super::types::{EngineConfig, HolidayFile, OfficeLocation, WorkPolicy};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml        # Work policy (required)
/// ├── office.yaml        # Office geofence (optional)
/// └── holidays/
///     └── 2026.yaml      # Holiday tables (optional)
/// ```
///
/// Missing optional files are not errors: without `office.yaml` every event
/// falls back to manual work-type selection, and without holiday files every
/// weekday counts as a business day.
///
/// # Example
///
/// ```no_run
/// use worktime_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Standard day: {} minutes", loader.policy().daily_standard_minutes());
/// # Ok::<(), worktime_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] when `policy.yaml` is missing
    /// - [`EngineError::ConfigParseError`] when any present file is invalid
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<WorkPolicy>(&path.join("policy.yaml"))?;

        let office_path = path.join("office.yaml");
        let office = if office_path.exists() {
            Some(Self::load_yaml::<OfficeLocation>(&office_path)?)
        } else {
            warn!(
                path = %office_path.display(),
                "No office configuration, work type will require manual selection"
            );
            None
        };

        let holidays = Self::load_holidays(&path.join("holidays"))?;

        info!(
            path = %path.display(),
            holidays = holidays.len(),
            office = office.is_some(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(policy, office, holidays),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every holiday file in the holidays directory.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<HolidayTable> {
        let mut table = HolidayTable::default();

        if !holidays_dir.exists() {
            warn!(
                path = %holidays_dir.display(),
                "No holiday tables, every weekday counts as a business day"
            );
            return Ok(table);
        }

        let dir_str = holidays_dir.display().to_string();
        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let file = Self::load_yaml::<HolidayFile>(&path)?;
            table.extend(file.holidays);
        }

        Ok(table)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the work policy.
    pub fn policy(&self) -> &WorkPolicy {
        self.config.policy()
    }

    /// Returns the office geofence, if configured.
    pub fn office(&self) -> Option<&OfficeLocation> {
        self.config.office()
    }

    /// Returns the holiday table.
    pub fn holidays(&self) -> &HolidayTable {
        self.config.holidays()
    }
}
