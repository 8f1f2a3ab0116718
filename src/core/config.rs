//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`] centralized settings for one supervisor run.
//!
//! Values are expected to be already resolved by the embedding application
//! (config files, env, flags); the supervisor only validates them.
//!
//! ## Invalid values
//! - `deadline = 0s` is rejected (a zero budget would time out every shutdown)
//! - `signals = []` is rejected (the run could never leave `Running`)
//! - `bus_capacity = 0` is accepted and clamped to 1
//! - deadlines too large for an `Instant` (e.g. `Duration::MAX`) are accepted and capped

use std::time::Duration;

use crate::error::RuntimeError;
use crate::signals::Signal;

/// Configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `deadline`: per-unit shutdown budget, measured from the cancellation fan-out
/// - `signals`: OS signals that start the shutdown (used by the default [`OsSignals`](crate::OsSignals) source)
/// - `bus_capacity`: lower bound for the event bus ring buffer (grown to fit the registered units)
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Maximum time each unit gets to shut down gracefully.
    ///
    /// Every unit gets the full budget independently; one slow unit does not
    /// shorten or extend another's.
    pub deadline: Duration,

    /// Signals that wake the supervisor.
    ///
    /// Ignored when a custom [`SignalSource`](crate::SignalSource) is installed.
    pub signals: Vec<Signal>,

    /// Minimum capacity of the event bus broadcast channel ring buffer.
    ///
    /// A run uses at least enough capacity for every unit's lifecycle events.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Returns a config with the given deadline in whole seconds and defaults elsewhere.
    pub fn with_deadline_secs(secs: u64) -> Self {
        Self {
            deadline: Duration::from_secs(secs),
            ..Self::default()
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks the config for values the supervisor cannot run with.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use unitvisor::SupervisorConfig;
    ///
    /// let mut cfg = SupervisorConfig::default();
    /// assert!(cfg.validate().is_ok());
    ///
    /// cfg.deadline = Duration::ZERO;
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.deadline.is_zero() {
            return Err(RuntimeError::InvalidConfig {
                reason: "shutdown deadline must be greater than zero".to_string(),
            });
        }
        if self.signals.is_empty() {
            return Err(RuntimeError::InvalidConfig {
                reason: "at least one termination signal is required".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `deadline = 10s`
    /// - `signals = [Interrupt, Terminate]`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(10),
            signals: vec![Signal::Interrupt, Signal::Terminate],
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = SupervisorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.deadline, Duration::from_secs(10));
        assert_eq!(cfg.signals, vec![Signal::Interrupt, Signal::Terminate]);
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let cfg = SupervisorConfig::with_deadline_secs(0);
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.as_label(), "runtime_invalid_config");
    }

    #[test]
    fn test_empty_signal_set_rejected() {
        let cfg = SupervisorConfig {
            signals: Vec::new(),
            ..SupervisorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = SupervisorConfig {
            bus_capacity: 0,
            ..SupervisorConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert!(cfg.validate().is_ok());
    }
}
