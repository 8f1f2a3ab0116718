//! # Basic Example
//!
//! Two server-like units (a TCP echo listener and a ticker) supervised together.
//! Press Ctrl-C (or send SIGTERM) to trigger the graceful shutdown.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example basic
//! ```

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use unitvisor::{
    RunOutcome, ShutdownContext, Supervisor, SupervisorConfig, UnitError, UnitFn, UnitRef,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let listener = TcpListener::bind("127.0.0.1:7070").await?;
    tracing::info!(addr = %listener.local_addr()?, "echo listening");

    let sup = Supervisor::builder(SupervisorConfig::with_deadline_secs(5))
        .with_units([echo(listener), ticker()])
        .build()?;

    let report = sup.run().await?;
    match report.outcome() {
        RunOutcome::AllStopped => println!("stopped gracefully on {}", report.signal),
        RunOutcome::Degraded => {
            for unit in report.failures() {
                println!("{}: {:?}", unit.name, unit.shutdown);
            }
        }
    }
    Ok(())
}

fn echo(listener: TcpListener) -> UnitRef {
    let stop = CancellationToken::new();
    let listener = std::sync::Arc::new(listener);
    let serve = stop.clone();

    UnitFn::arc(
        "echo",
        move || {
            let listener = listener.clone();
            let stop = serve.clone();
            async move {
                loop {
                    let (mut sock, _) = tokio::select! {
                        _ = stop.cancelled() => return,
                        accepted = listener.accept() => match accepted {
                            Ok(conn) => conn,
                            Err(_) => continue,
                        },
                    };
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        while let Ok(n) = sock.read(&mut buf).await {
                            if n == 0 || sock.write_all(&buf[..n]).await.is_err() {
                                break;
                            }
                        }
                    });
                }
            }
        },
        move |_ctx: ShutdownContext| {
            let stop = stop.clone();
            async move {
                stop.cancel();
                Ok::<_, UnitError>(())
            }
        },
    )
}

fn ticker() -> UnitRef {
    let stop = CancellationToken::new();
    let serve = stop.clone();

    UnitFn::arc(
        "ticker",
        move || {
            let stop = serve.clone();
            async move {
                let mut tick = tokio::time::interval(Duration::from_secs(1));
                loop {
                    tokio::select! {
                        _ = stop.cancelled() => return,
                        _ = tick.tick() => println!("tick"),
                    }
                }
            }
        },
        move |ctx: ShutdownContext| {
            let stop = stop.clone();
            async move {
                stop.cancel();
                // Pretend to flush something, well inside the budget.
                tokio::time::sleep(ctx.remaining() / 10).await;
                Ok::<_, UnitError>(())
            }
        },
    )
}
