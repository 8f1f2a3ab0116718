//! # Cross-platform OS signal handling.
//!
//! [`OsSignals`] listens for a configurable set of process signals.
//!
//! ## Signals
//! **Unix platforms:** any of `SIGINT`, `SIGTERM`, `SIGQUIT`, `SIGHUP`
//! (default: `SIGINT` + `SIGTERM`).
//!
//! **Other platforms:** `Ctrl-C` via [`tokio::signal::ctrl_c`], reported as
//! [`Signal::Interrupt`]; the configured set is ignored.

use futures::future::{self, BoxFuture};

use crate::error::RuntimeError;
use crate::signals::{Signal, SignalSource};

/// Signal source backed by the operating system.
#[derive(Debug, Clone)]
pub struct OsSignals {
    signals: Vec<Signal>,
}

impl OsSignals {
    /// Listens for the given signals. Duplicates are ignored.
    pub fn new(signals: impl IntoIterator<Item = Signal>) -> Self {
        let mut set: Vec<Signal> = Vec::new();
        for s in signals {
            if !set.contains(&s) {
                set.push(s);
            }
        }
        Self { signals: set }
    }

    /// The signals this source listens for.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }
}

impl Default for OsSignals {
    fn default() -> Self {
        Self::new([Signal::Interrupt, Signal::Terminate])
    }
}

impl SignalSource for OsSignals {
    /// Registers one listener per configured signal.
    ///
    /// Each call creates independent signal listeners.
    #[cfg(unix)]
    fn listen(&self) -> Result<BoxFuture<'static, Signal>, RuntimeError> {
        use tokio::signal::unix::signal;

        if self.signals.is_empty() {
            return Ok(Box::pin(future::pending::<Signal>()));
        }

        let mut waits: Vec<BoxFuture<'static, Signal>> = Vec::with_capacity(self.signals.len());
        for &sig in &self.signals {
            let mut stream = signal(sig.kind())?;
            waits.push(Box::pin(async move {
                if stream.recv().await.is_none() {
                    // Listener gone without delivering; never report a signal we did not see.
                    future::pending::<()>().await;
                }
                sig
            }));
        }

        Ok(Box::pin(async move {
            let (sig, _, _) = future::select_all(waits).await;
            sig
        }))
    }

    #[cfg(not(unix))]
    fn listen(&self) -> Result<BoxFuture<'static, Signal>, RuntimeError> {
        Ok(Box::pin(async {
            if tokio::signal::ctrl_c().await.is_err() {
                future::pending::<()>().await;
            }
            Signal::Interrupt
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_removed() {
        let src = OsSignals::new([Signal::Terminate, Signal::Quit, Signal::Terminate]);
        assert_eq!(src.signals(), &[Signal::Terminate, Signal::Quit]);
    }

    #[test]
    fn test_default_set() {
        assert_eq!(
            OsSignals::default().signals(),
            &[Signal::Interrupt, Signal::Terminate]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_first_delivered_signal_wins() {
        use nix::sys::signal::{Signal as NixSignal, raise};

        // Listeners stay installed for the process lifetime, so the raise cannot kill it.
        let src = OsSignals::new([Signal::Terminate, Signal::Quit]);
        let fut = src.listen().expect("register SIGTERM and SIGQUIT");

        raise(NixSignal::SIGQUIT).expect("raise SIGQUIT");
        let sig = tokio::time::timeout(std::time::Duration::from_secs(5), fut)
            .await
            .expect("SIGQUIT delivered");
        assert_eq!(sig, Signal::Quit);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_listen_registers_without_firing() {
        let src = OsSignals::new([Signal::Hangup]);
        let fut = src.listen().expect("register SIGHUP");
        let res = tokio::time::timeout(std::time::Duration::from_millis(50), fut).await;
        assert!(res.is_err(), "no signal was sent, future must stay pending");
    }
}
