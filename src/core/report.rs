//! # Outcome of one supervisor run.
//!
//! [`Supervisor::run`](crate::Supervisor::run) returns a [`ShutdownReport`] once the
//! shutdown barrier is passed. The report is informational: every failure in it has
//! already been published as an event (and logged by [`LogWriter`](crate::LogWriter)),
//! and none of them is turned into an error.

use crate::error::UnitError;
use crate::signals::Signal;

/// Aggregate result of the shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every unit shut down cleanly within its deadline.
    AllStopped,
    /// At least one unit's shutdown failed, panicked, or exceeded its deadline.
    Degraded,
}

/// What the starter of a unit had observed when the run finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartStatus {
    /// `start` was still running; its task is left detached.
    Running,
    /// `start` returned.
    Exited,
    /// `start` panicked (payload rendered as text).
    Panicked(String),
}

/// Per-unit entry of a [`ShutdownReport`].
#[derive(Debug, Clone)]
pub struct UnitReport {
    /// Unit name.
    pub name: String,
    /// Start-side status at the end of the run.
    pub start: StartStatus,
    /// Shutdown result (`Timeout`/`Panicked` are produced by the supervisor).
    pub shutdown: Result<(), UnitError>,
}

/// Result of a completed run, units in registration order.
#[derive(Debug, Clone)]
pub struct ShutdownReport {
    /// Signal that triggered the shutdown.
    pub signal: Signal,
    /// One entry per registered unit.
    pub units: Vec<UnitReport>,
}

impl ShutdownReport {
    /// Aggregate outcome.
    pub fn outcome(&self) -> RunOutcome {
        if self.units.iter().all(|u| u.shutdown.is_ok()) {
            RunOutcome::AllStopped
        } else {
            RunOutcome::Degraded
        }
    }

    /// Units whose shutdown did not end cleanly.
    pub fn failures(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.shutdown.is_err())
    }

    /// Looks a unit up by name.
    pub fn unit(&self, name: &str) -> Option<&UnitReport> {
        self.units.iter().find(|u| u.name == name)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn entry(name: &str, shutdown: Result<(), UnitError>) -> UnitReport {
        UnitReport {
            name: name.to_string(),
            start: StartStatus::Running,
            shutdown,
        }
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = ShutdownReport {
            signal: Signal::Terminate,
            units: Vec::new(),
        };
        assert_eq!(report.outcome(), RunOutcome::AllStopped);
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn test_one_timeout_degrades() {
        let report = ShutdownReport {
            signal: Signal::Interrupt,
            units: vec![
                entry("a", Ok(())),
                entry(
                    "b",
                    Err(UnitError::Timeout {
                        deadline: Duration::from_secs(1),
                    }),
                ),
            ],
        };
        assert_eq!(report.outcome(), RunOutcome::Degraded);
        let failed: Vec<_> = report.failures().map(|u| u.name.as_str()).collect();
        assert_eq!(failed, vec!["b"]);
        assert!(report.unit("a").is_some_and(|u| u.shutdown.is_ok()));
        assert!(report.unit("zzz").is_none());
    }
}
