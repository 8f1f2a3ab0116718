//! # Blocking unit adapter.
//!
//! Some servers own their thread: `serve()` blocks until told to stop, and `stop()`
//! blocks until the server has drained. [`BlockingUnit`] runs both on tokio's
//! blocking pool so they never stall the async workers.
//!
//! Panics raised on the blocking thread are re-raised in the calling task, so the
//! supervisor's fault boundary reports them like any other unit panic.
//!
//! **Note**: a `serve()` that never returns keeps its blocking thread alive, and
//! dropping the tokio runtime waits for it. Prefer `Runtime::shutdown_timeout` in
//! binaries that host non-cooperative blocking units.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinError;
use tracing::warn;

use crate::error::UnitError;
use crate::units::unit::{ShutdownContext, Unit};

/// Thread-blocking server lifecycle.
pub trait BlockingServe: Send + Sync + 'static {
    /// Stable name used in events.
    fn name(&self) -> &str;

    /// Blocks for the server's lifetime.
    fn serve(&self);

    /// Blocks until stopped or `deadline` passes.
    fn stop(&self, deadline: std::time::Instant) -> Result<(), UnitError>;
}

/// Adapts a [`BlockingServe`] to the async [`Unit`] contract.
#[derive(Debug)]
pub struct BlockingUnit<S> {
    inner: Arc<S>,
}

impl<S: BlockingServe> BlockingUnit<S> {
    /// Wraps `server`.
    pub fn new(server: S) -> Self {
        Self {
            inner: Arc::new(server),
        }
    }

    /// Wraps `server` and returns a shared handle.
    pub fn arc(server: S) -> Arc<Self> {
        Arc::new(Self::new(server))
    }
}

/// Re-raises a blocking-pool panic in the current task; any other join error
/// (the runtime cancelled the blocking task) becomes [`UnitError::Failed`].
fn resume(err: JoinError) -> UnitError {
    if err.is_panic() {
        std::panic::resume_unwind(err.into_panic());
    }
    UnitError::failed(err.to_string())
}

#[async_trait]
impl<S: BlockingServe> Unit for BlockingUnit<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn start(&self) {
        let inner = Arc::clone(&self.inner);
        if let Err(e) = tokio::task::spawn_blocking(move || inner.serve()).await {
            let err = resume(e);
            warn!(
                target: "unitvisor",
                unit = self.inner.name(),
                error = %err,
                "blocking serve did not run to completion"
            );
        }
    }

    async fn shutdown(&self, ctx: ShutdownContext) -> Result<(), UnitError> {
        let inner = Arc::clone(&self.inner);
        let deadline = ctx.deadline().into_std();
        tokio::task::spawn_blocking(move || inner.stop(deadline))
            .await
            .unwrap_or_else(|e| Err(resume(e)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::core::fault::isolate;

    struct Spinner {
        stop: AtomicBool,
    }

    impl BlockingServe for Spinner {
        fn name(&self) -> &str {
            "spinner"
        }

        fn serve(&self) {
            while !self.stop.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(5));
            }
        }

        fn stop(&self, _deadline: std::time::Instant) -> Result<(), UnitError> {
            self.stop.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Exploding;

    impl BlockingServe for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn serve(&self) {
            panic!("bind failed");
        }

        fn stop(&self, _deadline: std::time::Instant) -> Result<(), UnitError> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stop_ends_serve() {
        let unit = BlockingUnit::arc(Spinner {
            stop: AtomicBool::new(false),
        });
        assert_eq!(unit.name(), "spinner");

        let u = Arc::clone(&unit);
        let serving = tokio::spawn(async move { u.start().await });

        unit.shutdown(ShutdownContext::new(Duration::from_secs(1)))
            .await
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), serving)
            .await
            .expect("serve returned")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_blocking_task_becomes_failure() {
        let handle = tokio::spawn(futures::future::pending::<()>());
        handle.abort();
        let join_err = handle.await.unwrap_err();
        assert!(join_err.is_cancelled());

        let err = resume(join_err);
        assert_eq!(err.as_label(), "unit_failed");
        assert!(err.to_string().contains("cancelled"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_serve_panic_reaches_fault_boundary() {
        let unit = BlockingUnit::new(Exploding);
        let res = isolate(unit.start()).await;
        assert_eq!(res, Err("bind failed".to_string()));
    }
}
