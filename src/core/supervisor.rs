//! # Supervisor: starts units, waits for the termination signal, drives shutdown.
//!
//! The [`Supervisor`] owns the registered units, the event bus wiring, and the
//! signal source. It is built once by [`SupervisorBuilder`](crate::SupervisorBuilder)
//! and consumed by [`Supervisor::run`].
//!
//! ## State machine
//! ```text
//! Idle ──run()──► Running ──signal──► ShuttingDown ──barrier──► Stopped
//! ```
//!
//! ## High-level architecture
//! ```text
//! run():
//!   signals.listen()?                         (armed before anything starts)
//!   subscriber_listener(): Bus ─► SubscriberSet::emit(&Event)   (until terminal event)
//!
//! Spawn per unit:
//!   unit[0]        unit[1]   ...   unit[N-1]
//!     ├─► tokio::spawn(run_start(unit))                  (detached starter)
//!     └─► waiters.spawn(run_shutdown(i, unit, token))    (JoinSet barrier)
//!
//! Shutdown path:
//!   signal future resolves
//!     └─► Bus.publish(SignalReceived)
//!     └─► token.cancel()            → every waiter wakes at once (fan-out)
//!     └─► waiters.join_next() ...   → each waiter: own ShutdownContext + deadline
//!     └─► Bus.publish(AllStopped | ShutdownDegraded)
//!     └─► listener drains, subscriber workers drain
//!     └─► ShutdownReport
//! ```
//!
//! ## Rules
//! - `run` returns only after the signal fired **and** every waiter finished or timed out.
//! - Starters are never awaited or aborted; a unit whose `start` never returns does not
//!   delay the fan-out or the return of `run`.
//! - No unit failure is returned as an error; all of them are published as events.
//! - The bus is sized from the unit count, so lifecycle events are not lost to lag;
//!   if the listener still lags, the skipped count is logged and emitted as `EventsLagged`.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::core::builder::SupervisorBuilder;
use crate::core::config::SupervisorConfig;
use crate::core::report::{ShutdownReport, StartStatus, UnitReport};
use crate::core::runner::{run_shutdown, run_start};
use crate::error::{RuntimeError, UnitError};
use crate::events::{Bus, Event, EventKind};
use crate::signals::SignalSource;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::units::UnitRef;

/// Coordinates unit start, the termination signal, and graceful shutdown.
pub struct Supervisor {
    cfg: SupervisorConfig,
    units: Vec<UnitRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    signals: Box<dyn SignalSource>,
}

impl Supervisor {
    /// Returns a builder for a supervisor with the given configuration.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        units: Vec<UnitRef>,
        subscribers: Vec<Arc<dyn Subscribe>>,
        signals: Box<dyn SignalSource>,
    ) -> Self {
        Self {
            cfg,
            units,
            subscribers,
            signals,
        }
    }

    /// The configuration this supervisor was built with.
    pub fn config(&self) -> &SupervisorConfig {
        &self.cfg
    }

    /// Names of the registered units, in registration order.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name())
    }

    /// Starts every unit, waits for the termination signal, then shuts every unit down.
    ///
    /// Resolves once every shutdown has completed or exceeded its deadline. If the
    /// signal never arrives, this never resolves.
    ///
    /// ### Errors
    /// Only [`RuntimeError::SignalSetup`] (or a custom source's error), returned before
    /// any unit is started.
    pub async fn run(self) -> Result<ShutdownReport, RuntimeError> {
        let signal_received = self.signals.listen()?;

        let bus = Bus::new(bus_capacity(&self.cfg, self.units.len()));
        let listener = subscriber_listener(&bus, self.subscribers);
        let token = CancellationToken::new();

        let mut starters = Vec::with_capacity(self.units.len());
        let mut waiters = JoinSet::new();
        for (index, unit) in self.units.iter().enumerate() {
            starters.push(tokio::spawn(run_start(Arc::clone(unit), bus.clone())));
            waiters.spawn(run_shutdown(
                index,
                Arc::clone(unit),
                token.clone(),
                self.cfg.deadline,
                bus.clone(),
            ));
        }

        let signal = signal_received.await;
        bus.publish(Event::new(EventKind::SignalReceived).with_signal(signal));
        token.cancel();

        let mut results: Vec<Option<Result<(), UnitError>>> =
            (0..self.units.len()).map(|_| None).collect();
        let mut lost = Vec::new();
        while let Some(joined) = waiters.join_next().await {
            match joined {
                Ok((index, res)) => results[index] = Some(res),
                Err(e) => lost.push(e.to_string()),
            }
        }
        if !lost.is_empty() {
            error!(target: "unitvisor", lost = ?lost, "shutdown-waiters did not complete");
        }

        let mut units = Vec::with_capacity(self.units.len());
        for ((unit, starter), shutdown) in self.units.iter().zip(starters).zip(results) {
            let shutdown = shutdown.unwrap_or_else(|| {
                let info = "shutdown-waiter did not complete".to_string();
                bus.publish(
                    Event::new(EventKind::UnitShutdownPanicked)
                        .with_unit(unit.name())
                        .with_reason(info.as_str()),
                );
                Err(UnitError::Panicked { info })
            });
            units.push(UnitReport {
                name: unit.name().to_string(),
                start: start_status(starter).await,
                shutdown,
            });
        }
        let report = ShutdownReport { signal, units };

        let failed = report.failures().count();
        if failed == 0 {
            bus.publish(Event::new(EventKind::AllStopped));
        } else {
            bus.publish(
                Event::new(EventKind::ShutdownDegraded)
                    .with_reason(format!("{failed} of {} units", report.units.len())),
            );
        }
        if let Err(e) = listener.await {
            error!(target: "unitvisor", error = %e, "event listener failed; events may be missing");
        }

        Ok(report)
    }
}

/// Events one unit can publish in a run: starting, exited/panicked,
/// shutdown starting, shutdown result.
const EVENTS_PER_UNIT: usize = 4;
/// Run-level events plus slack for subscriber reports.
const RUN_EVENTS: usize = 16;

/// Sizes the bus so that a run's own lifecycle events can never lag the listener.
fn bus_capacity(cfg: &SupervisorConfig, units: usize) -> usize {
    units
        .saturating_mul(EVENTS_PER_UNIT)
        .saturating_add(RUN_EVENTS)
        .max(cfg.bus_capacity_clamped())
}

/// Reads a starter's status without waiting on a unit that is still running.
async fn start_status(starter: JoinHandle<StartStatus>) -> StartStatus {
    if !starter.is_finished() {
        // Dropping the handle detaches the starter.
        return StartStatus::Running;
    }
    match starter.await {
        Ok(status) => status,
        Err(e) => StartStatus::Panicked(e.to_string()),
    }
}

/// Forwards bus events to the subscriber set until the terminal event, then drains it.
fn subscriber_listener(bus: &Bus, subscribers: Vec<Arc<dyn Subscribe>>) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    let set = SubscriberSet::new(subscribers, bus.clone());

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let terminal = ev.is_terminal();
                    set.emit(&ev);
                    if terminal {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(target: "unitvisor", skipped, "event listener lagged behind the bus");
                    set.emit(&Event::events_lagged(skipped));
                }
                Err(RecvError::Closed) => break,
            }
        }
        set.shutdown().await;
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.clone());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[test]
    fn test_bus_grows_with_unit_count() {
        let cfg = SupervisorConfig {
            bus_capacity: 4,
            ..SupervisorConfig::default()
        };
        assert_eq!(bus_capacity(&cfg, 0), RUN_EVENTS);
        assert_eq!(bus_capacity(&cfg, 50), 50 * EVENTS_PER_UNIT + RUN_EVENTS);
        assert_eq!(bus_capacity(&SupervisorConfig::default(), 1), 1024);
    }

    #[tokio::test]
    async fn test_listener_reports_skipped_events() {
        let bus = Bus::new(2);
        let rec = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![rec.clone()];
        let listener = subscriber_listener(&bus, subs);

        // The listener task has not run yet; the ring overwrites the oldest four.
        for _ in 0..5 {
            bus.publish(Event::new(EventKind::UnitStarting));
        }
        bus.publish(Event::new(EventKind::AllStopped));
        listener.await.unwrap();

        let seen = rec.seen.lock().unwrap();
        let kinds: Vec<EventKind> = seen.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::EventsLagged,
                EventKind::UnitStarting,
                EventKind::AllStopped
            ]
        );
        assert_eq!(seen[0].reason.as_deref(), Some("skipped=4"));
    }
}
