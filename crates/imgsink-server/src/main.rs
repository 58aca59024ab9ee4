use anyhow::Context;
use clap::Parser;
use imgsink_server::server::{
    config::{CliArgs, ServerConfig},
    pool::WorkerPool,
    service::{AppState, router},
    telemetry::init_telemetry,
    upload::{PassthroughRescale, UploadOrchestrator},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry();

    // One pool per process, passed by reference into the orchestrator; the
    // orchestrator never owns its lifecycle.
    let pool = Arc::new(WorkerPool::new(config.num_workers));
    let uploads = Arc::new(UploadOrchestrator::new(
        config.base_path.clone(),
        Arc::clone(&pool),
        Arc::new(PassthroughRescale),
    ));
    let app = router(AppState { uploads });

    let listener = TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr))?;
    tracing::info!(
        addr = %config.server_addr,
        base_path = %config.base_path.display(),
        workers = config.num_workers,
        "imgsink server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // The listener has stopped accepting connections; now refuse new work and
    // give in-flight processing a bounded window to finish.
    tracing::info!("listener stopped, shutting down worker pool");
    pool.shutdown();
    if pool.drain(config.shutdown_timeout).await {
        tracing::info!("worker pool drained");
    } else {
        tracing::warn!(
            in_flight = pool.in_flight(),
            "graceful drain timed out"
        );
    }

    tracing::info!("service shut down successfully");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
}
