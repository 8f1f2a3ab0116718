//! # Unit contract.
//!
//! A [`Unit`] is a long-running, server-like entity: an HTTP listener, a queue
//! consumer, a background ticker. The supervisor only ever calls the two contract
//! operations on it:
//!
//! ```text
//! start()                  runs for the unit's lifetime (once per run)
//! shutdown(ShutdownContext) asks it to stop before ctx.deadline()
//! ```
//!
//! ## Rules
//! - `start` has no result. A unit that stops on its own simply returns; a unit
//!   that cannot run panics, and the panic is caught and logged by the supervisor.
//! - `shutdown` is invoked once per run, after the termination signal, even if
//!   `start` already returned. On an already-stopped unit it must return `Ok(())`
//!   promptly.
//! - `start` and `shutdown` run concurrently on different tasks; coordinate through
//!   the unit's own state (`Notify`, `CancellationToken`, atomics, ...).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::UnitError;

/// Shared handle to a unit, as registered with the supervisor.
pub type UnitRef = Arc<dyn Unit>;

/// Budgets too large to represent as an `Instant` are capped at roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Deadline-bounded context handed to [`Unit::shutdown`].
///
/// The deadline is measured from the moment the shutdown-waiter observed the
/// cancellation, not from process start. The supervisor stops waiting once it passes.
#[derive(Debug, Clone, Copy)]
pub struct ShutdownContext {
    deadline: Instant,
    budget: Duration,
}

impl ShutdownContext {
    /// Creates a context expiring `budget` from now.
    ///
    /// A budget that overflows `Instant` (e.g. `Duration::MAX`) is capped, never panics.
    pub fn new(budget: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(budget)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self { deadline, budget }
    }

    /// Point in time at which the supervisor gives up on this shutdown.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// The full budget this context was created with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before the deadline (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Returns `true` once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Completes when the deadline passes.
    pub async fn expired(&self) {
        tokio::time::sleep_until(self.deadline).await;
    }
}

/// # Long-running, gracefully stoppable unit.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use unitvisor::{ShutdownContext, Unit, UnitError};
///
/// struct Ticker {
///     stop: CancellationToken,
/// }
///
/// #[async_trait]
/// impl Unit for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn start(&self) {
///         while !self.stop.is_cancelled() {
///             tokio::select! {
///                 _ = self.stop.cancelled() => break,
///                 _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => {}
///             }
///         }
///     }
///
///     async fn shutdown(&self, _ctx: ShutdownContext) -> Result<(), UnitError> {
///         self.stop.cancel();
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Unit: Send + Sync + 'static {
    /// Returns a stable, human-readable unit name (used in events and the report).
    fn name(&self) -> &str;

    /// Runs the unit until it stops on its own or honors a shutdown request.
    async fn start(&self);

    /// Stops the unit gracefully, returning an error if it could not stop cleanly.
    ///
    /// Implementations may watch [`ShutdownContext::expired`] to give up early;
    /// the supervisor abandons the call at the deadline regardless.
    async fn shutdown(&self, ctx: ShutdownContext) -> Result<(), UnitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_context_expires_after_budget() {
        let ctx = ShutdownContext::new(Duration::from_secs(2));
        assert!(!ctx.is_expired());
        assert_eq!(ctx.budget(), Duration::from_secs(2));
        assert_eq!(ctx.remaining(), Duration::from_secs(2));

        ctx.expired().await;
        assert!(ctx.is_expired());
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_unbounded_budget_is_capped() {
        let ctx = ShutdownContext::new(Duration::MAX);
        assert_eq!(ctx.budget(), Duration::MAX);
        assert!(!ctx.is_expired());
        assert!(ctx.remaining() > Duration::from_secs(86_400 * 365));
    }
}
