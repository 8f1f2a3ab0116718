//! # Programmatic termination trigger.
//!
//! [`ManualSignal`] stands in for OS delivery: tests fire it synthetically, and
//! embedding applications can use it to shut the supervisor down from code.
//!
//! ## Rules
//! - Single-fire: the first [`fire`](ManualSignal::fire) wins, later calls are no-ops.
//! - Firing before the run starts is fine; the run then goes straight to shutdown.
//! - Clones share state.

use std::sync::{Arc, OnceLock};

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;
use crate::signals::{Signal, SignalSource};

#[derive(Debug, Default)]
struct Inner {
    token: CancellationToken,
    fired: OnceLock<Signal>,
}

/// Clonable, single-fire signal source.
///
/// # Example
/// ```
/// use unitvisor::{ManualSignal, Signal};
///
/// let trigger = ManualSignal::new();
/// assert!(trigger.fire(Signal::Terminate));
/// assert!(!trigger.fire(Signal::Interrupt));
/// assert_eq!(trigger.fired(), Some(Signal::Terminate));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualSignal {
    inner: Arc<Inner>,
}

impl ManualSignal {
    /// Creates an unfired trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the trigger. Returns `false` if it had already fired.
    pub fn fire(&self, signal: Signal) -> bool {
        if self.inner.fired.set(signal).is_ok() {
            self.inner.token.cancel();
            true
        } else {
            false
        }
    }

    /// Returns `true` once the trigger has fired.
    pub fn is_fired(&self) -> bool {
        self.inner.fired.get().is_some()
    }

    /// The signal the trigger fired with, if any.
    pub fn fired(&self) -> Option<Signal> {
        self.inner.fired.get().copied()
    }
}

impl SignalSource for ManualSignal {
    fn listen(&self) -> Result<BoxFuture<'static, Signal>, RuntimeError> {
        let inner = Arc::clone(&self.inner);
        Ok(Box::pin(async move {
            inner.token.cancelled().await;
            // `fired` is set before the token is cancelled.
            inner.fired.get().copied().unwrap_or(Signal::Terminate)
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_listen_resolves_with_first_signal() {
        let trigger = ManualSignal::new();
        let fut = trigger.listen().unwrap();

        let t = trigger.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            t.fire(Signal::Quit);
            t.fire(Signal::Interrupt);
        });

        assert_eq!(fut.await, Signal::Quit);
        assert!(trigger.is_fired());
    }

    #[tokio::test]
    async fn test_fired_before_listen() {
        let trigger = ManualSignal::new();
        trigger.fire(Signal::Interrupt);
        assert_eq!(trigger.listen().unwrap().await, Signal::Interrupt);
    }

    #[tokio::test]
    async fn test_unfired_stays_pending() {
        let trigger = ManualSignal::new();
        let res = tokio::time::timeout(Duration::from_millis(20), trigger.listen().unwrap()).await;
        assert!(res.is_err());
        assert!(!trigger.is_fired());
    }
}
