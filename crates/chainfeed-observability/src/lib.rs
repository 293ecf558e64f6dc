//! # chainfeed-observability
//!
//! Structured logging for ChainFeed binaries.
//!
//! Logs always go to stderr: the example programs print records on stdout
//! and tests parse that output line by line.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
