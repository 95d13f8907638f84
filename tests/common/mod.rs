//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use apidoc_recorder::config::{AppConfig, DocConfig};
use apidoc_recorder::{HttpServer, Recorder, Shutdown};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running server plus the handles needed to stop it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub recorder: Recorder,
    pub doc_path: PathBuf,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop accepting, drain, and wait until pending documentation is written.
    pub async fn stop(self) -> PathBuf {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .unwrap()
            .unwrap();
        self.doc_path
    }
}

/// Fresh `<dir>/apidoc.html` path under the system temp dir.
pub fn temp_doc_path() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("apidoc_it_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("apidoc.html")
}

/// Start `app` on an ephemeral port with documentation configured by `doc`.
pub async fn start_server(app: Router, doc: DocConfig) -> TestServer {
    let doc_path = PathBuf::from(&doc.doc_path);
    let mut config = AppConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.doc = doc;

    let recorder = Recorder::start(config.doc.clone()).unwrap();
    let listener = TcpListener::bind(&config.server.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, app, recorder.clone());
    let handle = tokio::spawn(server.run(listener, server_shutdown));

    TestServer {
        addr,
        recorder,
        doc_path,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
