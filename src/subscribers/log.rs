//! # LogWriter: events as `tracing` records
//!
//! Maps every [`Event`] to one structured `tracing` record. Faults are logged at
//! `ERROR`, timeouts and degraded outcomes at `WARN`, normal progress at `INFO`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  unitvisor: unit starting unit="http"
//! INFO  unitvisor: termination signal received signal="SIGTERM"
//! INFO  unitvisor: unit shutdown starting unit="http" deadline_ms=10000
//! ERROR unitvisor: unit start panicked unit="worker" reason="bind failed"
//! WARN  unitvisor: unit shutdown exceeded deadline unit="stuck" deadline_ms=2000
//! WARN  unitvisor: shutdown finished with failures reason="1 of 3 units"
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber, installed by default on every supervisor.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let unit = e.unit.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("");
        let deadline_ms = e.deadline_ms.unwrap_or(0);

        match e.kind {
            EventKind::SignalReceived => {
                let signal = e.signal.map(|s| s.as_str()).unwrap_or("unknown");
                info!(target: "unitvisor", signal, "termination signal received");
            }
            EventKind::UnitStarting => {
                info!(target: "unitvisor", unit, "unit starting");
            }
            EventKind::UnitExited => {
                info!(target: "unitvisor", unit, "unit exited");
            }
            EventKind::UnitStartPanicked => {
                error!(target: "unitvisor", unit, reason, "unit start panicked");
            }
            EventKind::UnitShutdownStarting => {
                info!(target: "unitvisor", unit, deadline_ms, "unit shutdown starting");
            }
            EventKind::UnitStopped => {
                info!(target: "unitvisor", unit, "unit stopped");
            }
            EventKind::UnitShutdownFailed => {
                error!(target: "unitvisor", unit, reason, "unit shutdown failed");
            }
            EventKind::UnitShutdownPanicked => {
                error!(target: "unitvisor", unit, reason, "unit shutdown panicked");
            }
            EventKind::UnitShutdownTimedOut => {
                warn!(target: "unitvisor", unit, deadline_ms, "unit shutdown exceeded deadline");
            }
            EventKind::AllStopped => {
                info!(target: "unitvisor", "all units stopped");
            }
            EventKind::ShutdownDegraded => {
                warn!(target: "unitvisor", reason, "shutdown finished with failures");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "unitvisor", subscriber = unit, reason, "subscriber dropped event");
            }
            EventKind::EventsLagged => {
                warn!(target: "unitvisor", reason, "event listener lagged, events skipped");
            }
            EventKind::SubscriberPanicked => {
                error!(target: "unitvisor", subscriber = unit, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
