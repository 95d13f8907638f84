//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the recorder
//! and the bundled demo server. All types derive Serde traits for
//! deserialization from config files, but embedding applications usually
//! build a [`DocConfig`] in code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default output document when `doc_path` is left empty.
pub const DEFAULT_DOC_PATH: &str = "apidoc.html";

/// Root configuration for the demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration.
    pub server: ServerConfig,

    /// Documentation recorder settings.
    pub doc: DocConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Documentation recorder configuration.
///
/// Set once at startup; the recorder never re-reads it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocConfig {
    /// Master switch. When false every hook is a pass-through.
    pub on: bool,

    /// Base URLs shown at the top of the rendered page (label -> URL).
    pub base_urls: BTreeMap<String, String>,

    /// Title of the rendered page.
    pub doc_title: String,

    /// Output HTML path. The JSON store lives next to it as `<doc_path>.json`.
    pub doc_path: String,

    /// Capacity of the queue between request handlers and the writer task.
    pub queue_capacity: usize,

    /// Request bodies declaring a larger Content-Length are not captured.
    pub max_capture_bytes: usize,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            on: false,
            base_urls: BTreeMap::new(),
            doc_title: "API Documentation".to_string(),
            doc_path: DEFAULT_DOC_PATH.to_string(),
            queue_capacity: 1024,
            max_capture_bytes: 32_000_000,
        }
    }
}

impl DocConfig {
    /// Output HTML path, falling back to [`DEFAULT_DOC_PATH`] when empty.
    pub fn doc_path(&self) -> &str {
        if self.doc_path.trim().is_empty() {
            DEFAULT_DOC_PATH
        } else {
            &self.doc_path
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_doc_path_falls_back() {
        let config = DocConfig {
            doc_path: String::new(),
            ..DocConfig::default()
        };
        assert_eq!(config.doc_path(), "apidoc.html");

        let config = DocConfig {
            doc_path: "docs/api.html".into(),
            ..DocConfig::default()
        };
        assert_eq!(config.doc_path(), "docs/api.html");
    }

    #[test]
    fn test_minimal_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [doc]
            on = true
            doc_title = "Pets"

            [doc.base_urls]
            staging = "https://staging.example.com"
            "#,
        )
        .unwrap();

        assert!(config.doc.on);
        assert_eq!(config.doc.doc_title, "Pets");
        assert_eq!(config.doc.doc_path(), "apidoc.html");
        assert_eq!(config.doc.queue_capacity, 1024);
        assert_eq!(
            config.doc.base_urls.get("staging").map(String::as_str),
            Some("https://staging.example.com")
        );
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }
}
