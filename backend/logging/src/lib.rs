//! Structured logging for Switchboard.
//!
//! Console output, optional rolling NDJSON files, and secret scrubbing for
//! strings that may carry a bot token.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogOptions};
pub use redact::redact_sensitive_data;
