//! Axum middleware.

pub mod doc_capture;
