//! Error types used by the unitvisor runtime and its units.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`]: errors raised by the supervisor itself while preparing a run.
//! - [`UnitError`]: errors raised by (or on behalf of) an individual unit's shutdown.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the unitvisor runtime.
///
/// These never describe a unit failure: unit failures are reported through events
/// and the [`ShutdownReport`](crate::ShutdownReport). A `RuntimeError` means the
/// supervisor could not be built or could not arm its signal source, and in both
/// cases no unit has been started.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration rejected by [`SupervisorConfig::validate`](crate::SupervisorConfig::validate).
    #[error("invalid supervisor config: {reason}")]
    InvalidConfig {
        /// What is wrong with the config.
        reason: String,
    },

    /// Installing the termination signal listeners failed.
    #[error("failed to install signal listener: {source}")]
    SignalSetup {
        /// The underlying I/O error from the OS.
        #[from]
        source: std::io::Error,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use unitvisor::RuntimeError;
    ///
    /// let err = RuntimeError::InvalidConfig { reason: "deadline must be > 0".into() };
    /// assert_eq!(err.as_label(), "runtime_invalid_config");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidConfig { .. } => "runtime_invalid_config",
            RuntimeError::SignalSetup { .. } => "runtime_signal_setup",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::InvalidConfig { reason } => format!("invalid config: {reason}"),
            RuntimeError::SignalSetup { source } => format!("signal setup: {source}"),
        }
    }
}

/// # Errors produced while shutting a unit down.
///
/// `Failed` is what a [`Unit`](crate::Unit) returns itself. `Timeout` and `Panicked`
/// are produced by the supervisor on the unit's behalf.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// Graceful stop did not complete cleanly.
    #[error("shutdown failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Shutdown did not finish before its deadline.
    #[error("shutdown exceeded deadline of {deadline:?}")]
    Timeout {
        /// The deadline that was exceeded.
        deadline: Duration,
    },

    /// The unit panicked; the panic was caught by the fault boundary.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl UnitError {
    /// Shorthand for [`UnitError::Failed`].
    ///
    /// # Example
    /// ```
    /// use unitvisor::UnitError;
    ///
    /// let err = UnitError::failed("listener still busy");
    /// assert_eq!(err.to_string(), "shutdown failed: listener still busy");
    /// ```
    pub fn failed(error: impl Into<String>) -> Self {
        UnitError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use unitvisor::UnitError;
    /// use std::time::Duration;
    ///
    /// let err = UnitError::Timeout { deadline: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "unit_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitError::Failed { .. } => "unit_failed",
            UnitError::Timeout { .. } => "unit_timeout",
            UnitError::Panicked { .. } => "unit_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            UnitError::Failed { error } => format!("error: {error}"),
            UnitError::Timeout { deadline } => format!("timeout: {deadline:?}"),
            UnitError::Panicked { info } => format!("panic: {info}"),
        }
    }
}
