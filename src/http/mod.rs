//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → middleware/doc_capture.rs (request side captured, body restored)
//!     → application handlers
//!     → middleware/doc_capture.rs (response side captured, call queued)
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;

pub use middleware::doc_capture::doc_capture_middleware;
pub use server::HttpServer;
