//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish runtime events emitted by the supervisor, its starters and
//! shutdown-waiters, and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor::run`, starters, shutdown-waiters,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumer**: the subscriber listener spawned by `Supervisor::run`, which
//!   fans out to `SubscriberSet` until the terminal event.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
