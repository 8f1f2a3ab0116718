//! # Unit abstractions.
//!
//! This module provides the core unit-related types:
//! - [`Unit`] - trait every supervised server-like entity implements
//! - [`UnitRef`] - shared reference to a unit (`Arc<dyn Unit>`)
//! - [`ShutdownContext`] - deadline handed to `Unit::shutdown`
//! - [`UnitFn`] - closure-backed unit
//! - [`BlockingUnit`] - adapter for thread-blocking servers

mod blocking;
mod unit;
mod unit_fn;

pub use blocking::{BlockingServe, BlockingUnit};
pub use unit::{ShutdownContext, Unit, UnitRef};
pub use unit_fn::UnitFn;
