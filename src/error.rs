//! Error types for the lifecycle registry.
//!
//! `Error` is the library-level error enum, built with `thiserror`. Driver
//! collaborators report their own failures through [`DriverError`], which the
//! registry either consumes (start's continue-on-failure policy) or wraps.
//!
//! The taxonomy mirrors the command surface:
//!
//! - **`Config` / `Configuration`**: file-level and semantic configuration
//!   failures, caught before any driver is constructed.
//! - **`NoDeviceStarted`**: `start` exhausted the attachment table without a
//!   successful initialization.
//! - **`NotRunning`**: `stop` or `status` found no occupied entry in scope.
//! - **`Driver`**: a collaborator construction/initialization failure that
//!   escaped the registry (not produced by `start`, which swallows these and
//!   keeps scanning).

use thiserror::Error;

/// What stage of the driver lifecycle a collaborator failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    /// Constructor could not produce an instance.
    Construction,
    /// The instance was built but its `init` contract failed.
    Initialization,
}

impl std::fmt::Display for DriverErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DriverErrorKind::Construction => "construction",
            DriverErrorKind::Initialization => "initialization",
        };
        write!(f, "{}", label)
    }
}

/// Failure reported by a driver collaborator.
#[derive(Error, Debug, Clone)]
#[error("driver {kind} error: {message}")]
pub struct DriverError {
    /// Lifecycle stage the failure occurred in.
    pub kind: DriverErrorKind,
    /// Human-readable diagnostic from the collaborator.
    pub message: String,
}

impl DriverError {
    /// Build a driver error from a kind and message.
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a construction-stage failure.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Construction, message)
    }

    /// Shorthand for an initialization-stage failure.
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Initialization, message)
    }
}

/// Convenience alias for results using the library error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for the lifecycle registry.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be read.
    #[error("configuration error: {0}")]
    Config(#[from] std::io::Error),

    /// Configuration file could not be parsed as TOML.
    #[error("configuration error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but failed semantic validation (duplicate
    /// attachment point, empty table).
    #[error("configuration validation error: {0}")]
    Configuration(String),

    /// `start` found no eligible unoccupied entry in scope, or every
    /// candidate it tried failed to initialize.
    #[error("no device started")]
    NoDeviceStarted,

    /// `stop` or `status` targeted a selector with no occupied entry.
    #[error("driver not running")]
    NotRunning,

    /// A driver collaborator failure surfaced outside the start scan.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_error_display_includes_stage() {
        let err = DriverError::initialization("no response at 0x10");
        assert_eq!(
            err.to_string(),
            "driver initialization error: no response at 0x10"
        );

        let err = DriverError::construction("bus 7 unavailable");
        assert!(err.to_string().contains("construction"));
    }

    #[test]
    fn library_error_messages() {
        assert_eq!(Error::NotRunning.to_string(), "driver not running");
        assert_eq!(Error::NoDeviceStarted.to_string(), "no device started");
    }
}
