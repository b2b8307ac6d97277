//! Non-fatal warnings attached to computed results.

use serde::{Deserialize, Serialize};

/// The class of problem a warning reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A time or coordinate string could not be parsed; the item was skipped.
    ParseFailure,
    /// Inconsistent data was clamped or corrected.
    DataIntegrity,
    /// Configuration was absent and a safe default was used.
    ConfigurationMissing,
}

/// A warning generated during a computation.
///
/// Warnings never stop a computation. They tell the caller that a
/// conservative default (zero duration, manual choice, non-holiday) was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineWarning {
    /// The class of problem.
    pub kind: WarningKind,
    /// A stable code identifying the specific problem (e.g. `VACATION_OVERLAP`).
    pub code: String,
    /// A human-readable description.
    pub message: String,
}

impl EngineWarning {
    /// Creates a parse-failure warning.
    pub fn parse_failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ParseFailure,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a data-integrity warning.
    pub fn data_integrity(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DataIntegrity,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration-missing warning.
    pub fn configuration_missing(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ConfigurationMissing,
            code: code.into(),
            message: message.into(),
        }
    }
}
