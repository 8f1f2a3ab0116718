//! # Per-unit activities: starter and shutdown-waiter.
//!
//! For every registered unit the supervisor spawns exactly one of each.
//!
//! ## Event flow
//!
//! ```text
//! Starter:
//!   publish UnitStarting → unit.start() → Returned → publish UnitExited
//!                                       → Panicked → publish UnitStartPanicked
//!
//! Shutdown-waiter:
//!   token.cancelled() → ctx = ShutdownContext::new(deadline)
//!                     → publish UnitShutdownStarting
//!                     → spawn unit.shutdown(ctx), wait until ctx.deadline()
//!                       (the whole step runs inside the fault boundary)
//!                         ├─ Ok(())      → publish UnitStopped
//!                         ├─ Err(e)      → publish UnitShutdownFailed
//!                         ├─ panic       → publish UnitShutdownPanicked
//!                         └─ deadline    → publish UnitShutdownTimedOut (call left detached)
//! ```
//!
//! ## Rules
//! - Both activities run user code only through [`fault::isolate`]; neither can panic.
//! - The deadline clock starts when the waiter observes cancellation.
//! - A timed-out shutdown is **not** aborted: graceful-only, the supervisor just stops waiting.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    core::fault,
    core::report::StartStatus,
    error::UnitError,
    events::{Bus, Event, EventKind},
    units::{ShutdownContext, UnitRef},
};

/// Runs `unit.start()` inside the fault boundary.
pub(crate) async fn run_start(unit: UnitRef, bus: Bus) -> StartStatus {
    bus.publish(Event::new(EventKind::UnitStarting).with_unit(unit.name()));

    match fault::isolate(unit.start()).await {
        Ok(()) => {
            bus.publish(Event::new(EventKind::UnitExited).with_unit(unit.name()));
            StartStatus::Exited
        }
        Err(info) => {
            bus.publish(
                Event::new(EventKind::UnitStartPanicked)
                    .with_unit(unit.name())
                    .with_reason(info.as_str()),
            );
            StartStatus::Panicked(info)
        }
    }
}

/// Waits for `token`, then drives `unit.shutdown()` under a fresh deadline.
///
/// Returns `index` untouched so the supervisor can place the result in
/// registration order. Every outcome, including a fault in the waiter itself,
/// is published before returning.
pub(crate) async fn run_shutdown(
    index: usize,
    unit: UnitRef,
    token: CancellationToken,
    deadline: Duration,
    bus: Bus,
) -> (usize, Result<(), UnitError>) {
    token.cancelled().await;

    let res = fault::isolate(drive_shutdown(&unit, deadline, &bus))
        .await
        .unwrap_or_else(|info| Err(UnitError::Panicked { info }));

    publish_result(&bus, unit.name(), deadline, &res);
    (index, res)
}

async fn drive_shutdown(unit: &UnitRef, deadline: Duration, bus: &Bus) -> Result<(), UnitError> {
    let ctx = ShutdownContext::new(deadline);
    bus.publish(
        Event::new(EventKind::UnitShutdownStarting)
            .with_unit(unit.name())
            .with_deadline(deadline),
    );

    let call = {
        let unit = UnitRef::clone(unit);
        tokio::spawn(async move {
            fault::isolate(unit.shutdown(ctx))
                .await
                .unwrap_or_else(|info| Err(UnitError::Panicked { info }))
        })
    };

    // Dropping the handle on timeout detaches the call; it is never aborted.
    match time::timeout_at(ctx.deadline(), call).await {
        Ok(Ok(res)) => res,
        Ok(Err(join_err)) => Err(UnitError::Panicked {
            info: join_err.to_string(),
        }),
        Err(_elapsed) => Err(UnitError::Timeout { deadline }),
    }
}

fn publish_result(bus: &Bus, name: &str, deadline: Duration, res: &Result<(), UnitError>) {
    let ev = match res {
        Ok(()) => Event::new(EventKind::UnitStopped),
        Err(UnitError::Timeout { .. }) => {
            Event::new(EventKind::UnitShutdownTimedOut).with_deadline(deadline)
        }
        Err(UnitError::Panicked { info }) => {
            Event::new(EventKind::UnitShutdownPanicked).with_reason(info.as_str())
        }
        Err(e) => Event::new(EventKind::UnitShutdownFailed).with_reason(e.to_string()),
    };
    bus.publish(ev.with_unit(name));
}
