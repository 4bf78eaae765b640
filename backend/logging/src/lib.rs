//! `archivist-logging` — structured logging setup.
//!
//! Wraps `tracing` with a human-readable console layer and a
//! daily-rolling NDJSON file layer, with level control via `RUST_LOG`.

pub mod logger;

pub use logger::init_logger;
