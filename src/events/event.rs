//! # Runtime events emitted by the supervisor.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Signal events**: the termination request that starts the shutdown
//! - **Start events**: what each unit's starter observed
//! - **Shutdown events**: per-unit shutdown progress and result, plus the final outcome
//! - **Subscriber events**: problems delivering events to subscribers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, unit name,
//! reasons, and the shutdown deadline.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use unitvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::UnitShutdownFailed)
//!     .with_unit("http")
//!     .with_reason("listener busy")
//!     .with_deadline(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::UnitShutdownFailed);
//! assert_eq!(ev.unit.as_deref(), Some("http"));
//! assert_eq!(ev.deadline_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::signals::Signal;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `unit`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `unit`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    /// The subscriber listener fell behind the bus and skipped events.
    ///
    /// Delivered straight to subscribers, never through the bus.
    ///
    /// Sets:
    /// - `reason`: number of skipped events ("skipped=N")
    EventsLagged,

    // === Signal events ===
    /// Termination signal observed; cancellation is fanned out right after.
    ///
    /// Sets:
    /// - `signal`: the signal received
    SignalReceived,

    // === Start events ===
    /// Starter is about to invoke `start`.
    ///
    /// Sets:
    /// - `unit`: unit name
    UnitStarting,

    /// `start` returned on its own.
    ///
    /// Sets:
    /// - `unit`: unit name
    UnitExited,

    /// `start` panicked; the unit is treated as stopped.
    ///
    /// Sets:
    /// - `unit`: unit name
    /// - `reason`: panic info/message
    UnitStartPanicked,

    // === Shutdown events ===
    /// Shutdown-waiter observed the cancellation and is invoking `shutdown`.
    ///
    /// Sets:
    /// - `unit`: unit name
    /// - `deadline_ms`: shutdown budget (ms)
    UnitShutdownStarting,

    /// `shutdown` returned `Ok(())` within the deadline.
    ///
    /// Sets:
    /// - `unit`: unit name
    UnitStopped,

    /// `shutdown` returned an error.
    ///
    /// Sets:
    /// - `unit`: unit name
    /// - `reason`: error message
    UnitShutdownFailed,

    /// `shutdown` panicked.
    ///
    /// Sets:
    /// - `unit`: unit name
    /// - `reason`: panic info/message
    UnitShutdownPanicked,

    /// `shutdown` did not finish before the deadline; the supervisor stopped waiting.
    ///
    /// Sets:
    /// - `unit`: unit name
    /// - `deadline_ms`: shutdown budget (ms)
    UnitShutdownTimedOut,

    // === Terminal events ===
    /// Every unit shut down cleanly within its deadline. Last event of a run.
    AllStopped,

    /// At least one unit failed, panicked, or timed out during shutdown. Last event of a run.
    ///
    /// Sets:
    /// - `reason`: number of affected units
    ShutdownDegraded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Shutdown deadline in milliseconds (compact).
    pub deadline_ms: Option<u32>,
    /// Human-readable reason (errors, panic payloads, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Name of the unit (or subscriber), if applicable.
    pub unit: Option<Arc<str>>,
    /// Signal that triggered the shutdown.
    pub signal: Option<Signal>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            deadline_ms: None,
            reason: None,
            unit: None,
            signal: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a unit name.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches a deadline (stored as milliseconds).
    #[inline]
    pub fn with_deadline(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.deadline_ms = Some(ms);
        self
    }

    /// Attaches the received signal.
    #[inline]
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_unit(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_unit(subscriber)
            .with_reason(info)
    }

    /// Creates an event reporting `skipped` events lost to bus lag.
    #[inline]
    pub fn events_lagged(skipped: u64) -> Self {
        Event::new(EventKind::EventsLagged).with_reason(format!("skipped={skipped}"))
    }

    /// Returns `true` for the event that closes a run.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::AllStopped | EventKind::ShutdownDegraded)
    }

    /// Returns `true` for unit faults: start panics and any shutdown that did not end cleanly.
    #[inline]
    pub fn is_unit_fault(&self) -> bool {
        matches!(
            self.kind,
            EventKind::UnitStartPanicked
                | EventKind::UnitShutdownFailed
                | EventKind::UnitShutdownPanicked
                | EventKind::UnitShutdownTimedOut
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::UnitStarting);
        let b = Event::new(EventKind::UnitStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_deadline_saturates() {
        let ev = Event::new(EventKind::UnitShutdownTimedOut).with_deadline(Duration::MAX);
        assert_eq!(ev.deadline_ms, Some(u32::MAX));
    }

    #[test]
    fn test_classification() {
        assert!(Event::new(EventKind::AllStopped).is_terminal());
        assert!(Event::new(EventKind::ShutdownDegraded).is_terminal());
        assert!(!Event::new(EventKind::UnitStopped).is_terminal());

        assert!(Event::new(EventKind::UnitShutdownTimedOut).is_unit_fault());
        assert!(Event::new(EventKind::UnitStartPanicked).is_unit_fault());
        assert!(!Event::new(EventKind::UnitExited).is_unit_fault());
    }
}
