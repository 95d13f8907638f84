//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap an application Router with the documentation capture layer
//! - Wire up middleware (tracing, timeout)
//! - Bind server to listener
//! - Graceful shutdown, then flush pending documentation

use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::doc::Recorder;

/// HTTP server hosting an application with documentation capture.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    recorder: Recorder,
}

impl HttpServer {
    /// Create a new HTTP server around `app`.
    pub fn new(config: AppConfig, app: Router, recorder: Recorder) -> Self {
        let router = Self::build_router(&config, app, &recorder);
        Self {
            router,
            config,
            recorder,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Capture sits inside the timeout so a timed-out request is answered
    /// with 408 and never documented.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, app: Router, recorder: &Recorder) -> Router {
        recorder
            .attach(app)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            documenting = self.recorder.is_on(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        self.recorder.flush().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}
