//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Start the documentation recorder (loads and re-renders prior docs)
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when the recorder is ready)

use axum::Router;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::doc::{DocError, Recorder};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("documentation recorder: {0}")]
    Recorder(#[from] DocError),

    #[error("listener on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start every subsystem and serve `app` until Ctrl+C / SIGTERM.
pub async fn run(config: AppConfig, app: Router) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let recorder = Recorder::start(config.doc.clone())?;

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.server.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    HttpServer::new(config, app, recorder)
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)
}
