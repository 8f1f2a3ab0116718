//! Termination signal sources.
//!
//! The supervisor does not read OS signals directly; it asks a [`SignalSource`]
//! for a single-shot future and waits on it once per run.
//!
//! ## Contents
//! - [`Signal`] which termination request was observed
//! - [`SignalSource`] the injectable capability
//! - [`OsSignals`] real OS signal delivery (default)
//! - [`ManualSignal`] programmatic trigger (tests, embedding)

mod manual;
mod os;
mod source;

pub use manual::ManualSignal;
pub use os::OsSignals;
pub use source::{Signal, SignalSource};
