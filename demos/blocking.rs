//! # Blocking Unit Example
//!
//! Supervises a thread-owning server (a std-only polling loop) next to the usual
//! async units. `serve()` and `stop()` run on tokio's blocking pool.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example blocking
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;
use unitvisor::{BlockingServe, BlockingUnit, Supervisor, SupervisorConfig, UnitError};

struct Poller {
    stop: AtomicBool,
    drained: AtomicBool,
    polls: AtomicU64,
}

impl BlockingServe for Poller {
    fn name(&self) -> &str {
        "poller"
    }

    fn serve(&self) {
        while !self.stop.load(Ordering::Acquire) {
            self.polls.fetch_add(1, Ordering::Relaxed);
            thread::sleep(Duration::from_millis(250));
        }
        self.drained.store(true, Ordering::Release);
    }

    fn stop(&self, deadline: Instant) -> Result<(), UnitError> {
        self.stop.store(true, Ordering::Release);
        while !self.drained.load(Ordering::Acquire) {
            if Instant::now() >= deadline {
                return Err(UnitError::failed("poller did not drain"));
            }
            thread::sleep(Duration::from_millis(10));
        }
        println!("poller drained after {} polls", self.polls.load(Ordering::Relaxed));
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let poller = BlockingUnit::arc(Poller {
        stop: AtomicBool::new(false),
        drained: AtomicBool::new(false),
        polls: AtomicU64::new(0),
    });

    let report = Supervisor::builder(SupervisorConfig::with_deadline_secs(2))
        .with_unit(poller)
        .build()?
        .run()
        .await?;

    println!("{:?}", report.outcome());
    Ok(())
}
