//! # unitvisor
//!
//! **Unitvisor** is a process lifecycle supervisor for Rust services.
//!
//! It starts a set of long-running, server-like units concurrently, waits for a
//! termination signal, and drives a coordinated, deadline-bounded graceful shutdown
//! of every unit. A unit that panics or fails to stop cannot block or corrupt its
//! siblings.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Unit      │   │    Unit      │   │    Unit      │
//!     │ (http api)   │   │ (consumer)   │   │ (ticker)     │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - SignalSource (OsSignals / ManualSignal)                        │
//! │  - CancellationToken (single fan-out)                             │
//! │  - JoinSet of shutdown-waiters (barrier)                          │
//! │  - Bus + SubscriberSet (structured events, LogWriter)             │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   starter + waiter   starter + waiter   starter + waiter
//!   (fault boundary)   (fault boundary)   (fault boundary)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Supervisor::run()
//!   ├─► signals.listen()?                 arm first, fail before starting anything
//!   ├─► for each unit:
//!   │     ├─► spawn starter: isolate(unit.start())
//!   │     └─► spawn waiter:  token.cancelled() → isolate(unit.shutdown(ctx)) ≤ deadline
//!   ├─► first signal ─► publish SignalReceived ─► token.cancel()
//!   ├─► join every waiter (clean / failed / panicked / timed out)
//!   └─► publish AllStopped | ShutdownDegraded ─► ShutdownReport
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------|---------------------------------------------|
//! | **Units**         | Contract for supervised servers, plus adapters.           | [`Unit`], [`UnitFn`], [`BlockingUnit`]      |
//! | **Supervision**   | Start, signal, fan-out, deadline-bounded shutdown.        | [`Supervisor`], [`SupervisorBuilder`]       |
//! | **Signals**       | Injectable termination source.                            | [`SignalSource`], [`OsSignals`], [`ManualSignal`] |
//! | **Subscriber API**| Structured lifecycle events (logging, metrics, alerts).   | [`Subscribe`], [`LogWriter`], [`Event`]     |
//! | **Errors**        | Typed errors for setup and unit shutdown.                 | [`RuntimeError`], [`UnitError`]             |
//! | **Configuration** | Deadline, signal set, bus capacity.                       | [`SupervisorConfig`]                        |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use unitvisor::{
//!     ManualSignal, RunOutcome, ShutdownContext, Signal, Supervisor, SupervisorConfig,
//!     UnitError, UnitFn, UnitRef,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stop = CancellationToken::new();
//!     let ticker: UnitRef = UnitFn::arc(
//!         "ticker",
//!         {
//!             let stop = stop.clone();
//!             move || {
//!                 let stop = stop.clone();
//!                 async move { stop.cancelled().await }
//!             }
//!         },
//!         move |_ctx: ShutdownContext| {
//!             let stop = stop.clone();
//!             async move {
//!                 stop.cancel();
//!                 Ok::<_, UnitError>(())
//!             }
//!         },
//!     );
//!
//!     // Real binaries keep the default OS signal source.
//!     let trigger = ManualSignal::new();
//!     let sup = Supervisor::builder(SupervisorConfig::with_deadline_secs(5))
//!         .with_unit(ticker)
//!         .with_signal_source(trigger.clone())
//!         .build()?;
//!
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         trigger.fire(Signal::Terminate);
//!     });
//!
//!     let report = sup.run().await?;
//!     assert_eq!(report.outcome(), RunOutcome::AllStopped);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod signals;
mod subscribers;
mod units;

// ---- Public re-exports ----

pub use crate::core::{
    RunOutcome, ShutdownReport, StartStatus, Supervisor, SupervisorBuilder, SupervisorConfig,
    UnitReport,
};
pub use error::{RuntimeError, UnitError};
pub use events::{Event, EventKind};
pub use signals::{ManualSignal, OsSignals, Signal, SignalSource};
pub use subscribers::{LogWriter, Subscribe};
pub use units::{BlockingServe, BlockingUnit, ShutdownContext, Unit, UnitFn, UnitRef};
