use std::sync::Arc;

use crate::{
    core::config::SupervisorConfig,
    error::RuntimeError,
    signals::{OsSignals, SignalSource},
    subscribers::{LogWriter, Subscribe},
    units::UnitRef,
};
use super::supervisor::Supervisor;

/// Builder for constructing a [`Supervisor`].
///
/// Registration happens only here; once built, the set of units is fixed.
///
/// # Example
/// ```
/// use unitvisor::{ManualSignal, Supervisor, SupervisorConfig, UnitRef};
///
/// let trigger = ManualSignal::new();
/// let maybe_admin: Option<UnitRef> = None; // e.g. disabled by config
///
/// let sup = Supervisor::builder(SupervisorConfig::with_deadline_secs(3))
///     .with_units([maybe_admin])
///     .with_signal_source(trigger.clone())
///     .build()
///     .expect("valid config");
/// assert_eq!(sup.unit_names().count(), 0);
/// ```
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    units: Vec<UnitRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    signals: Option<Box<dyn SignalSource>>,
    log_writer: bool,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            units: Vec::new(),
            subscribers: Vec::new(),
            signals: None,
            log_writer: true,
        }
    }

    /// Registers one unit.
    pub fn with_unit(mut self, unit: UnitRef) -> Self {
        self.units.push(unit);
        self
    }

    /// Registers several units; `None` entries are skipped.
    ///
    /// Accepts both `UnitRef` and `Option<UnitRef>` items.
    pub fn with_units<I>(mut self, units: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<UnitRef>>,
    {
        self.units.extend(units.into_iter().filter_map(Into::into));
        self
    }

    /// Adds event subscribers (in addition to the built-in [`LogWriter`]).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subscribers);
        self
    }

    /// Replaces the default [`OsSignals`] source (built from `cfg.signals`).
    pub fn with_signal_source(mut self, source: impl SignalSource) -> Self {
        self.signals = Some(Box::new(source));
        self
    }

    /// Does not install the built-in [`LogWriter`].
    pub fn without_log_writer(mut self) -> Self {
        self.log_writer = false;
        self
    }

    /// Validates the configuration and returns the supervisor.
    ///
    /// ### Errors
    /// [`RuntimeError::InvalidConfig`] if [`SupervisorConfig::validate`] fails.
    pub fn build(self) -> Result<Supervisor, RuntimeError> {
        self.cfg.validate()?;

        let signals: Box<dyn SignalSource> = match self.signals {
            Some(source) => source,
            None => Box::new(OsSignals::new(self.cfg.signals.iter().copied())),
        };

        let mut subscribers: Vec<Arc<dyn Subscribe>> =
            Vec::with_capacity(self.subscribers.len() + 1);
        if self.log_writer {
            subscribers.push(Arc::new(LogWriter::new()));
        }
        subscribers.extend(self.subscribers);

        Ok(Supervisor::new_internal(
            self.cfg,
            self.units,
            subscribers,
            signals,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::UnitError;
    use crate::units::{ShutdownContext, UnitFn};

    fn unit(name: &'static str) -> UnitRef {
        UnitFn::arc(
            name,
            || async {},
            |_ctx: ShutdownContext| async { Ok::<_, UnitError>(()) },
        )
    }

    #[test]
    fn test_none_entries_skipped_order_kept() {
        let sup = Supervisor::builder(SupervisorConfig::default())
            .with_units([Some(unit("a")), None, Some(unit("b"))])
            .with_unit(unit("c"))
            .with_units(vec![unit("d")])
            .build()
            .unwrap();

        let names: Vec<&str> = sup.unit_names().collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_zero_deadline_fails_build() {
        let cfg = SupervisorConfig {
            deadline: Duration::ZERO,
            ..SupervisorConfig::default()
        };
        let err = Supervisor::builder(cfg).build().err().unwrap();
        assert!(matches!(err, RuntimeError::InvalidConfig { .. }));
    }
}
