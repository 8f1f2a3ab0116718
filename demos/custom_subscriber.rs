//! # Custom Subscriber Example
//!
//! Counts shutdown outcomes with a custom [`Subscribe`] implementation and fires the
//! termination programmatically with [`ManualSignal`].
//!
//! ## Run
//! ```bash
//! cargo run --example custom_subscriber
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use unitvisor::{
    Event, EventKind, ManualSignal, ShutdownContext, Signal, Subscribe, Supervisor,
    SupervisorConfig, UnitError, UnitFn, UnitRef,
};

#[derive(Default)]
struct ShutdownStats {
    stopped: AtomicU64,
    faulted: AtomicU64,
}

#[async_trait]
impl Subscribe for ShutdownStats {
    async fn on_event(&self, event: &Event) {
        match event.kind {
            EventKind::UnitStopped => {
                self.stopped.fetch_add(1, Ordering::Relaxed);
            }
            _ if event.is_unit_fault() => {
                self.faulted.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "shutdown-stats"
    }
}

fn sleeper(name: &'static str, stop_takes: Duration) -> UnitRef {
    UnitFn::arc(
        name,
        futures::future::pending::<()>,
        move |_ctx: ShutdownContext| async move {
            tokio::time::sleep(stop_takes).await;
            Ok::<_, UnitError>(())
        },
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let stats = Arc::new(ShutdownStats::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![stats.clone()];
    let trigger = ManualSignal::new();

    let sup = Supervisor::builder(SupervisorConfig::with_deadline_secs(1))
        .with_units([
            Some(sleeper("fast", Duration::from_millis(50))),
            None,
            Some(sleeper("too-slow", Duration::from_secs(3))),
        ])
        .with_subscribers(subs)
        .with_signal_source(trigger.clone())
        .without_log_writer()
        .build()?;

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.fire(Signal::Terminate);
    });

    let report = sup.run().await?;

    println!();
    println!("Shutdown:");
    println!(" ├─► Outcome: {:?}", report.outcome());
    println!(" ├─► Stopped: {}", stats.stopped.load(Ordering::Relaxed));
    println!(" └─► Faulted: {}", stats.faulted.load(Ordering::Relaxed));
    Ok(())
}
