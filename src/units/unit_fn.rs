//! # Function-backed unit (`UnitFn`)
//!
//! [`UnitFn`] wraps two closures: one producing the `start` future and one producing
//! the `shutdown` future. Each call creates a fresh future; shared state between the
//! two must be captured explicitly (`Arc<...>`, `CancellationToken`).
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use unitvisor::{ShutdownContext, UnitError, UnitFn, UnitRef};
//!
//! let stop = CancellationToken::new();
//! let worker: UnitRef = UnitFn::arc(
//!     "worker",
//!     {
//!         let stop = stop.clone();
//!         move || {
//!             let stop = stop.clone();
//!             async move { stop.cancelled().await }
//!         }
//!     },
//!     move |_ctx: ShutdownContext| {
//!         let stop = stop.clone();
//!         async move {
//!             stop.cancel();
//!             Ok::<_, UnitError>(())
//!         }
//!     },
//! );
//!
//! assert_eq!(worker.name(), "worker");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::UnitError;
use crate::units::unit::{ShutdownContext, Unit};

/// Function-backed unit implementation.
pub struct UnitFn<S, D> {
    name: Cow<'static, str>,
    start: S,
    shutdown: D,
}

impl<S, SFut, D, DFut> UnitFn<S, D>
where
    S: Fn() -> SFut + Send + Sync + 'static,
    SFut: Future<Output = ()> + Send + 'static,
    D: Fn(ShutdownContext) -> DFut + Send + Sync + 'static,
    DFut: Future<Output = Result<(), UnitError>> + Send + 'static,
{
    /// Creates a new function-backed unit.
    ///
    /// Prefer [`UnitFn::arc`] when you immediately need a [`UnitRef`](crate::UnitRef).
    pub fn new(name: impl Into<Cow<'static, str>>, start: S, shutdown: D) -> Self {
        Self {
            name: name.into(),
            start,
            shutdown,
        }
    }

    /// Creates the unit and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, start: S, shutdown: D) -> Arc<Self> {
        Arc::new(Self::new(name, start, shutdown))
    }
}

impl<S, D> fmt::Debug for UnitFn<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitFn").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<S, SFut, D, DFut> Unit for UnitFn<S, D>
where
    S: Fn() -> SFut + Send + Sync + 'static,
    SFut: Future<Output = ()> + Send + 'static,
    D: Fn(ShutdownContext) -> DFut + Send + Sync + 'static,
    DFut: Future<Output = Result<(), UnitError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) {
        (self.start)().await
    }

    async fn shutdown(&self, ctx: ShutdownContext) -> Result<(), UnitError> {
        (self.shutdown)(ctx).await
    }
}
