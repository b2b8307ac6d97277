//! Configuration loading and management for the work-time accounting engine.
//!
//! This module loads the company work policy, the office geofence and the
//! holiday tables from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use worktime_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Lunch starts at {}s", config.policy().lunch.start_seconds());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EngineConfig, HolidayFile, LeaveLimits, LunchWindow, LunchWindowConfig, OfficeLocation,
    OvertimePolicy, WifiPolicy, WorkPolicy,
};
