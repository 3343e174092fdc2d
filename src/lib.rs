#![deny(missing_docs)]

//! Core library for the study guide generator: PDF text in, summary and practice questions out.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extract;
/// Generation client abstraction and adapters.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Generation metrics helpers.
pub mod metrics;
/// Summary and question pipelines.
pub mod processing;
/// Plain-text study guide rendering.
pub mod render;
/// In-memory study guide storage.
pub mod store;
