//! Error types for the work-time accounting engine.
//!
//! Only conditions the caller must act on are errors. Parse failures, integrity
//! problems and missing configuration inside the accounting path degrade to
//! conservative defaults and are reported as [`crate::models::EngineWarning`]s
//! instead.

use thiserror::Error;

use crate::models::{EventSource, RequestStatus};

/// The main error type for the engine.
///
/// # Example
///
/// ```
/// use worktime_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A time string supplied by the caller could not be parsed.
    #[error("Invalid time '{value}'")]
    InvalidTime {
        /// The rejected input.
        value: String,
    },

    /// A date string or calendar month supplied by the caller was invalid.
    #[error("Invalid date '{value}'")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// No event in the given list matched the requested time.
    #[error("No {list} event recorded at {time}")]
    EventNotFound {
        /// The list that was searched.
        list: EventSource,
        /// The time string that was looked up.
        time: String,
    },

    /// A request status change that the state machine does not allow.
    #[error("Cannot move request from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: RequestStatus,
        /// The requested status.
        to: RequestStatus,
    },

    /// A submission failed one or more business rules.
    #[error("Validation failed: {}", messages.join("; "))]
    ValidationFailed {
        /// Every rule violation, in rule order.
        messages: Vec<String>,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
