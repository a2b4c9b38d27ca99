//! Blocking HTTP transport over a shared async client.
//!
//! Uses async reqwest internally on a small shared tokio runtime, but
//! presents a sync interface so the pipeline stays strictly sequential.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error types for transport operations
#[derive(Debug)]
pub enum StreamError {
    /// HTTP error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
    /// I/O error
    Io(std::io::Error),
    /// Response body could not be decoded
    Decode(String),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for StreamError {}

impl StreamError {
    /// Create HTTP error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for StreamError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A successful (2xx) response with its body fully read.
#[derive(Debug, Clone)]
pub struct Response {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the `Content-Type` header announces JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// One-shot HTTP GET. Non-2xx statuses must be reported as `Err`.
pub trait Transport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, StreamError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, StreamError> {
        (**self).get(url, query)
    }
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the given whole-request timeout.
    pub fn new(request_timeout: Duration) -> Result<Self, StreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| StreamError::from_reqwest(&e))?;
        Ok(Self { client })
    }
}

/// Any final status outside 2xx (including 1xx and 3xx) is an error.
fn ensure_success(status: reqwest::StatusCode) -> Result<(), StreamError> {
    if status.is_success() {
        return Ok(());
    }
    Err(StreamError::Http {
        status: Some(status.as_u16()),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    })
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, StreamError> {
        SHARED_RUNTIME.handle().block_on(async {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| StreamError::from_reqwest(&e))?;
            ensure_success(response.status())?;

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let body = response
                .bytes()
                .await
                .map_err(|e| StreamError::from_reqwest(&e))?;

            Ok(Response {
                content_type,
                body: body.to_vec(),
            })
        })
    }
}
