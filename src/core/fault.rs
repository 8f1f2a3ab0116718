//! # Fault boundary.
//!
//! Every call into user code (`Unit::start`, `Unit::shutdown`, `Subscribe::on_event`)
//! goes through [`isolate`], which polls the future inside `catch_unwind` and
//! turns a panic into its rendered payload.
//!
//! ```text
//! isolate(fut) ──► Ok(output)
//!              └─► Err(info)   panic caught, payload as text
//! isolate_sync(f)              same, for synchronous calls
//! ```
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if the unit uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

/// Runs `fut` to completion, catching any panic raised while polling it.
pub(crate) async fn isolate<F: Future>(fut: F) -> Result<F::Output, String> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|payload| panic_message(&*payload))
}

/// Synchronous counterpart of [`isolate`] for plain calls into user code.
pub(crate) fn isolate_sync<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(&*payload))
}

/// Renders a panic payload (`&'static str` or `String` in practice).
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn explode() {
        panic!("boom");
    }

    #[tokio::test]
    async fn test_passes_output_through() {
        assert_eq!(isolate(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catches_str_panic() {
        let res = isolate(explode()).await;
        assert_eq!(res, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_catches_formatted_panic() {
        let n = 3;
        let res = isolate(async move {
            if n > 2 {
                panic!("too many: {n}");
            }
        })
        .await;
        assert_eq!(res, Err("too many: 3".to_string()));
    }

    #[test]
    fn test_sync_call_panic_is_caught() {
        assert_eq!(isolate_sync(|| 5), Ok(5));
        let res = isolate_sync(|| -> usize { panic!("bad capacity") });
        assert_eq!(res, Err("bad capacity".to_string()));
    }

    #[test]
    fn test_unknown_payload() {
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(&*payload), "unknown panic");
    }
}
