//! Resilient GET: retry with backoff, then parse JSON or hand back raw bytes.

use std::time::Duration;

use crate::config::HttpConfig;
use crate::retry::retry_with_backoff;
use crate::stream::{HttpTransport, StreamError, Transport};

/// Parsed response content.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body of a response whose content type announced JSON
    Json(serde_json::Value),
    /// Any other body, untouched
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Bytes(_) => None,
        }
    }
}

/// Blocking sleep used between attempts.
pub type Sleeper = Box<dyn Fn(Duration)>;

/// HTTP GET with a fixed attempt budget and exponential backoff.
///
/// Every failure (network, non-2xx status, undecodable JSON) is retried.
/// Exhaustion yields `None`; the caller decides what to skip.
pub struct Fetcher<T> {
    transport: T,
    max_attempts: u32,
    sleep: Sleeper,
}

impl Fetcher<HttpTransport> {
    /// Production fetcher from HTTP settings.
    pub fn from_config(config: &HttpConfig) -> Result<Self, StreamError> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::new(transport, config.max_attempts))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, max_attempts: u32) -> Self {
        Self {
            transport,
            max_attempts,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the backoff sleep (tests record durations instead of waiting).
    pub fn with_sleeper(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` with `query`; `None` once the attempt budget is spent.
    pub fn fetch(&self, url: &str, query: &[(&str, String)]) -> Option<Payload> {
        let label = describe(url, query);
        retry_with_backoff(
            &label,
            self.max_attempts,
            |_| self.try_fetch(url, query),
            &self.sleep,
        )
        .ok()
    }

    /// Like [`fetch`](Self::fetch) but only accepts a JSON payload.
    pub fn fetch_json(&self, url: &str, query: &[(&str, String)]) -> Option<serde_json::Value> {
        match self.fetch(url, query)? {
            Payload::Json(v) => Some(v),
            Payload::Bytes(body) => {
                log::warn!(
                    "{}: expected JSON, got {} raw bytes",
                    describe(url, query),
                    body.len()
                );
                None
            }
        }
    }

    fn try_fetch(&self, url: &str, query: &[(&str, String)]) -> Result<Payload, StreamError> {
        let response = self.transport.get(url, query)?;
        if response.is_json() {
            serde_json::from_slice(&response.body)
                .map(Payload::Json)
                .map_err(|e| StreamError::Decode(e.to_string()))
        } else {
            Ok(Payload::Bytes(response.body))
        }
    }
}

/// Short request description for log lines: `url?k=v&k=v`
fn describe(url: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let params: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{url}?{}", params.join("&"))
}
