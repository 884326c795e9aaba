//! Catalog Browser service
//!
//! Serves a paginated, filterable view over the items `1..=N` and stores the
//! selection and custom order of each search key.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host address (default: `127.0.0.1`)
//! - `PORT`: Server port (default: `3001`)
//! - `CATALOG_SIZE`: Catalog upper bound N (default: `1000000`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `catalog_browser=debug`)
//! - `WORKER_THREADS`: tokio worker threads, at most four per logical CPU

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_browser::api::{AppState, router};
use catalog_browser::domain::Catalog;
use catalog_browser::infrastructure::{ServerConfig, WorkerThreads};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_browser=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let worker_threads = WorkerThreads::from_env().unwrap_or_else(|error| {
        tracing::warn!(%error, "Ignoring WORKER_THREADS");
        WorkerThreads::Default
    });
    match worker_threads {
        WorkerThreads::Default => tracing::debug!("Using the default worker thread count"),
        WorkerThreads::Requested(threads) => tracing::info!(threads, "Worker threads set"),
        WorkerThreads::Capped { requested, limit } => {
            tracing::warn!(requested, limit, "WORKER_THREADS capped");
        }
    }

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = worker_threads.count() {
        builder.worker_threads(threads);
    }

    match builder.build() {
        Ok(runtime) => runtime.block_on(serve()),
        Err(error) => {
            tracing::error!(%error, "Failed to create tokio runtime");
            std::process::exit(1);
        }
    }
}

async fn serve() {
    tracing::info!("Starting Catalog Browser service");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %config.host,
        port = config.port,
        catalog_size = config.catalog_size,
        "Server configuration loaded"
    );

    let address = match config.socket_address() {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, "Invalid server address");
            std::process::exit(1);
        }
    };

    let application = router(AppState::in_memory(Catalog::new(config.catalog_size)));

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        "SIGINT"
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
        "SIGTERM"
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };
    tracing::info!(signal = received, "Draining connections before shutdown");
}
