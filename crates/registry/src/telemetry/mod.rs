//! Tracing setup: structured JSON logs, plus optional OTLP span export.
//!
//! # Telemetry invariants
//!
//! - **No PII** (student names, emails, phone numbers) may appear in any span
//!   attribute or log field. Log record ids and counts instead.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`) and
//!   overridden by `RUST_LOG` when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
