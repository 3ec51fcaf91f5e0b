//! # `hashjob-server`
//!
//! HTTP front end for [`hashjob`].
//!
//! ## Highlights
//! - **Immediate job IDs**: `POST /hash` answers before the password is hashed.
//! - **Deferred digests**: `GET /hash/{id}` returns the digest once the
//!   configured delay has passed.
//! - **Statistics**: `GET /stats` reports completed jobs and average hash time.
//! - **Graceful shutdown**: Ctrl+C or SIGTERM refuses new requests with 403,
//!   waits for every accepted job, then stops the listener.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin hashjob-server --release -- --port 8080 --hash-wait 5
//! ```

mod server;

use clap::Parser;
use hashjob::HashCoordinator;
use server::config::{CliArgs, ServerConfig};
use server::service::{handler::AppState, router::build_router};
use server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

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

    let providers = init_telemetry(config.debug)?;

    let listener = TcpListener::bind(config.server_addr).await?;
    log_startup_info(&config);

    let res = run_server(listener, config).await;
    providers.shutdown();
    res
}

fn log_startup_info(_config: &ServerConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting hash service on {} with full config: {:#?}",
            _config.server_addr,
            _config
        );
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting hash service on {} with a {:?} hash wait",
            _config.server_addr,
            _config.hash_wait
        );
    }
}

async fn run_server(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let coordinator = HashCoordinator::new(config.coordinator());
    let app = build_router(AppState::new(coordinator.clone()));

    // Cancelled only after the drain finishes, so requests arriving while
    // draining are still answered (with 403) instead of refused at accept.
    let stopped = CancellationToken::new();
    tokio::spawn(drain_on_signal(coordinator, stopped.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { stopped.cancelled().await })
        .await?;

    #[cfg(feature = "tracing")]
    tracing::info!("Service shut down successfully");
    Ok(())
}

async fn drain_on_signal(coordinator: HashCoordinator, stopped: CancellationToken) {
    shutdown_signal().await;

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Shutdown signal received, waiting for {} outstanding hash jobs...",
        coordinator.outstanding()
    );

    coordinator.shutdown().await;
    stopped.cancel();
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
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }
}
