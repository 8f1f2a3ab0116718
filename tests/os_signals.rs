#![cfg(unix)]

use std::time::Duration;

use nix::sys::signal::{Signal as NixSignal, raise};
use tokio_util::sync::CancellationToken;
use unitvisor::{
    RunOutcome, ShutdownContext, Signal, Supervisor, SupervisorConfig, UnitError, UnitFn, UnitRef,
};

#[tokio::test]
async fn test_default_source_wakes_on_sigterm() {
    let stop = CancellationToken::new();
    let serve = stop.clone();
    let unit: UnitRef = UnitFn::arc(
        "listener",
        move || {
            let serve = serve.clone();
            async move { serve.cancelled().await }
        },
        move |_ctx: ShutdownContext| {
            let stop = stop.clone();
            async move {
                stop.cancel();
                Ok::<_, UnitError>(())
            }
        },
    );

    let sup = Supervisor::builder(SupervisorConfig {
        signals: vec![Signal::Terminate],
        ..SupervisorConfig::with_deadline_secs(2)
    })
    .with_unit(unit)
    .without_log_writer()
    .build()
    .unwrap();

    let run = tokio::spawn(sup.run());
    // Let `run` install its SIGTERM listener before raising.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!run.is_finished());

    raise(NixSignal::SIGTERM).unwrap();
    let report = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("run woke on SIGTERM")
        .unwrap()
        .unwrap();

    assert_eq!(report.signal, Signal::Terminate);
    assert_eq!(report.outcome(), RunOutcome::AllStopped);
    assert_eq!(report.unit("listener").unwrap().shutdown, Ok(()));
}
