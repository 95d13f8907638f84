//! API documentation recorder for axum applications.
//!
//! Successful request/response pairs are captured by a middleware,
//! deduplicated per (verb, path), persisted as JSON and rendered into a
//! static HTML page.
//!
//! ```no_run
//! use apidoc_recorder::{DocConfig, Recorder};
//! use axum::{routing::get, Router};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = Recorder::start(DocConfig {
//!     on: true,
//!     doc_title: "Pet Store".into(),
//!     ..DocConfig::default()
//! })?;
//! let app = recorder.attach(Router::new().route("/pets", get(|| async { "[]" })));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod doc;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AppConfig, DocConfig};
pub use doc::{Api, Call, Recorder, Spec};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
