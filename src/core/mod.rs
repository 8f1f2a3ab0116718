//! Runtime core: orchestration and lifecycle.
//!
//! The public API from this module is [`Supervisor`], its [`SupervisorBuilder`],
//! [`SupervisorConfig`], and the [`ShutdownReport`] a run produces.
//!
//! Internal modules:
//! - [`runner`]: starter and shutdown-waiter activities for one unit;
//! - [`supervisor`]: spawns activities, waits for the signal, fans out, joins;
//! - [`fault`]: panic-catching boundary around all user code;
//! - [`builder`]: registration and validation;
//! - [`report`]: per-unit and aggregate outcome of a run.

mod builder;
mod config;
pub(crate) mod fault;
mod report;
mod runner;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::SupervisorConfig;
pub use report::{RunOutcome, ShutdownReport, StartStatus, UnitReport};
pub use supervisor::Supervisor;
