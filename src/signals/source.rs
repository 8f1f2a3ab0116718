//! # Signal source contract.
//!
//! A [`SignalSource`] is armed exactly once per run, **before** any unit is
//! started, so that a registration failure aborts the run with nothing to clean up.
//!
//! ```text
//! Supervisor::run()
//!   ├─► source.listen()?        (install listeners, may fail)
//!   ├─► spawn starters/waiters
//!   └─► fut.await               (first signal wins, later ones are ignored)
//! ```

use std::fmt;

use futures::future::BoxFuture;

use crate::error::RuntimeError;

/// A termination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGINT` (Ctrl-C in terminal).
    Interrupt,
    /// `SIGTERM` (default kill signal, used by systemd/Kubernetes).
    Terminate,
    /// `SIGQUIT`.
    Quit,
    /// `SIGHUP`.
    Hangup,
}

impl Signal {
    /// Conventional OS name of the signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Quit => "SIGQUIT",
            Signal::Hangup => "SIGHUP",
        }
    }

    #[cfg(unix)]
    pub(crate) fn kind(&self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Quit => SignalKind::quit(),
            Signal::Hangup => SignalKind::hangup(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces the single termination notification for a run.
///
/// ### Rules
/// - `listen` is called once per run; the returned future is awaited once.
/// - The future resolves with the **first** signal observed. If nothing is
///   ever observed it never resolves, and neither does the run.
/// - Errors from `listen` are returned from [`Supervisor::run`](crate::Supervisor::run)
///   before any unit is started.
///
/// # Example
/// ```
/// use futures::future::BoxFuture;
/// use unitvisor::{RuntimeError, Signal, SignalSource};
///
/// /// Fires immediately; handy for one-shot jobs.
/// struct Immediate;
///
/// impl SignalSource for Immediate {
///     fn listen(&self) -> Result<BoxFuture<'static, Signal>, RuntimeError> {
///         Ok(Box::pin(async { Signal::Terminate }))
///     }
/// }
/// ```
pub trait SignalSource: Send + Sync + 'static {
    /// Installs listeners and returns a future resolving on the first signal.
    fn listen(&self) -> Result<BoxFuture<'static, Signal>, RuntimeError>;
}
