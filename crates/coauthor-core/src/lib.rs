//! Coauthor Core - Common infrastructure for the co-authorship pipeline
//!
//! This crate provides the resilient HTTP fetcher, retry policy, logging
//! and progress reporting shared by the OpenAlex stages and the CLI.

pub mod config;
pub mod fetch;
pub mod logging;
pub mod progress;
pub mod retry;
pub mod stream;

// Re-exports for convenience
pub use config::HttpConfig;
pub use fetch::{Fetcher, Payload};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use retry::{backoff_duration, retry_with_backoff};
pub use stream::{HttpTransport, Response, SHARED_RUNTIME, StreamError, Transport};
