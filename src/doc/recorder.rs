//! Recorder handle and the single writer that owns the `Spec`.
//!
//! # Data Flow
//! ```text
//! request handlers ──try_send──▶ bounded queue ──▶ writer thread
//!                                                   ├─ DocState::merge
//!                                                   ├─ store::save_spec  (<doc_path>.json)
//!                                                   └─ render::write_page (<doc_path>)
//! ```
//!
//! # Design Decisions
//! - One writer serializes merge, persist and render, so ids and dedup hold
//!   under concurrent requests without a lock
//! - Enqueueing never blocks; a full queue drops the call
//! - File writes are blocking, so the writer runs on its own OS thread
//!   instead of a runtime worker

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tokio::sync::{mpsc, oneshot};

use crate::config::DocConfig;
use crate::doc::error::{DocError, DocResult};
use crate::doc::merge::{DocState, MergeOutcome};
use crate::doc::model::{Call, Spec};
use crate::doc::render::{self, DocView};
use crate::doc::store;
use crate::observability::metrics;

enum Job {
    Record(Call),
    Flush(oneshot::Sender<()>),
    Snapshot(oneshot::Sender<Spec>),
}

struct Inner {
    config: DocConfig,
    tx: Option<mpsc::Sender<Job>>,
    json_path: Option<PathBuf>,
    html_path: Option<PathBuf>,
}

/// Handle to the documentation recorder. Cheap to clone.
///
/// A disabled recorder has no writer and every operation is a no-op.
#[derive(Clone)]
pub struct Recorder {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("on", &self.is_on())
            .field("html_path", &self.inner.html_path)
            .finish()
    }
}

impl Recorder {
    /// A recorder that never captures anything.
    pub fn disabled() -> Self {
        Self::off(DocConfig::default())
    }

    fn off(config: DocConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: DocConfig { on: false, ..config },
                tx: None,
                json_path: None,
                html_path: None,
            }),
        }
    }

    /// Start recording according to `config`.
    ///
    /// Loads `<doc_path>.json` if present and re-renders the page from it.
    /// Failing to resolve the output paths or to write that initial page is
    /// an error; everything later is logged and skipped.
    pub fn start(config: DocConfig) -> DocResult<Self> {
        if !config.on {
            tracing::info!("API documentation recorder disabled");
            return Ok(Self::off(config));
        }

        let json_path = store::json_path(config.doc_path())?;
        let html_path = store::absolute(config.doc_path())?;
        let (spec, loaded) = store::load_or_default(&json_path);

        let writer = Writer {
            state: DocState::new(spec),
            json_path: json_path.clone(),
            html_path: html_path.clone(),
            title: config.doc_title.clone(),
            base_urls: config.base_urls.clone(),
        };
        if loaded {
            writer.render()?;
        }

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        thread::Builder::new()
            .name("apidoc-writer".to_string())
            .spawn(move || writer.run(rx))
            .map_err(DocError::Worker)?;

        tracing::info!(
            html = %html_path.display(),
            json = %json_path.display(),
            queue_capacity = config.queue_capacity,
            "API documentation recorder started"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                tx: Some(tx),
                json_path: Some(json_path),
                html_path: Some(html_path),
            }),
        })
    }

    pub fn is_on(&self) -> bool {
        self.inner.tx.is_some()
    }

    pub fn config(&self) -> &DocConfig {
        &self.inner.config
    }

    pub fn json_path(&self) -> Option<&Path> {
        self.inner.json_path.as_deref()
    }

    pub fn html_path(&self) -> Option<&Path> {
        self.inner.html_path.as_deref()
    }

    /// Queue a call for merging. Never waits; returns false if it was dropped.
    pub fn record(&self, call: Call) -> bool {
        let Some(tx) = &self.inner.tx else {
            return false;
        };
        match tx.try_send(Job::Record(call)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(Job::Record(call))) => {
                tracing::warn!(
                    method = %call.method_type,
                    path = %call.current_path,
                    "Documentation queue full, dropping call"
                );
                metrics::record_call_discarded("queue_full");
                false
            }
            Err(_) => {
                tracing::warn!("Documentation writer stopped, dropping call");
                false
            }
        }
    }

    /// Wait until every call queued before this one has been processed.
    pub async fn flush(&self) {
        let Some(tx) = &self.inner.tx else {
            return;
        };
        let (done_tx, done_rx) = oneshot::channel();
        if tx.send(Job::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Copy of the current spec, or `None` when disabled.
    pub async fn snapshot(&self) -> Option<Spec> {
        let tx = self.inner.tx.as_ref()?;
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(Job::Snapshot(reply_tx)).await.ok()?;
        reply_rx.await.ok()
    }
}

/// Sole owner of the `Spec` while recording.
struct Writer {
    state: DocState,
    json_path: PathBuf,
    html_path: PathBuf,
    title: String,
    base_urls: std::collections::BTreeMap<String, String>,
}

impl Writer {
    fn run(mut self, mut rx: mpsc::Receiver<Job>) {
        while let Some(job) = rx.blocking_recv() {
            match job {
                Job::Record(call) => self.record(call),
                Job::Flush(done) => {
                    let _ = done.send(());
                }
                Job::Snapshot(reply) => {
                    let _ = reply.send(self.state.spec().clone());
                }
            }
        }
        tracing::debug!("Documentation writer stopped");
    }

    fn record(&mut self, call: Call) {
        let method = call.method_type.clone();
        let path = call.current_path.clone();

        let outcome = self.state.merge(call);
        if let MergeOutcome::Duplicate { id } = outcome {
            tracing::debug!(id, method = %method, path = %path, "Equivalent call already documented");
            metrics::record_call_duplicate();
            return;
        }

        metrics::record_call_stored(self.state.spec().api_specs.len());
        tracing::info!(id = outcome.id(), method = %method, path = %path, "Documented new call");

        if let Err(e) = store::save_spec(self.state.spec(), &self.json_path) {
            tracing::error!(error = %e, "Failed to persist documentation spec");
            metrics::record_write_failure("json");
            return;
        }
        if let Err(e) = self.render() {
            tracing::error!(error = %e, "Failed to render documentation page");
            metrics::record_write_failure("html");
        }
    }

    fn render(&self) -> DocResult<()> {
        let view = DocView {
            title: &self.title,
            base_urls: &self.base_urls,
            apis: &self.state.spec().api_specs,
        };
        render::write_page(&view, &self.html_path)
    }
}
