//! API documentation recording subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP exchange
//!     → extract.rs (headers, query, body / form fields)
//!     → [capture middleware adds status and headers, filters status and .ico]
//!     → tee.rs (response streams to the client; bounded copy of the body)
//!     → recorder.rs (bounded queue → single writer)
//!     → merge.rs (find/create Api, assign id, dedup)
//!     → store.rs (<doc_path>.json, full rewrite)
//!     → render.rs (<doc_path>, static HTML)
//! ```
//!
//! # Design Decisions
//! - Documentation work never delays or fails the HTTP response
//! - Enabled/disabled is fixed at startup
//! - All errors are logged locally; nothing reaches the client

pub mod error;
pub mod extract;
pub mod merge;
pub mod model;
pub mod recorder;
pub mod render;
pub mod store;
pub mod tee;

pub use error::{DocError, DocResult};
pub use merge::{DocState, MergeOutcome};
pub use model::{Api, Call, FieldMap, Spec};
pub use recorder::Recorder;
