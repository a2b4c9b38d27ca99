//! HTTP settings shared by every fetcher

use std::time::Duration;

/// Default attempt budget per request
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default whole-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport and retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Abort a single request after this long (counts as a failed attempt)
    pub request_timeout: Duration,
    /// Attempts per request, including the first
    pub max_attempts: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
