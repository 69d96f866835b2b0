//! Retry policy and failure classification for registry requests.

use std::error::Error as _;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Default number of attempts for a single request.
pub const MAX_RETRIES: usize = 3;

/// Default delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// How often and how patiently a transient failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, Duration::from_millis(RETRY_DELAY_MS))
    }
}

/// Why a request did not produce a decoded body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// HTTP 404.
    #[error("Not found")]
    NotFound,

    /// Any other non-success status.
    #[error("HTTP Status {0}")]
    Status(u16),

    /// Connection, TLS or body transfer failure.
    #[error("{0}")]
    Transport(String),

    /// The request exceeded the client timeout. Not retried, so a lookup
    /// never waits longer than one timeout.
    #[error("{0}")]
    Timeout(String),

    /// The body arrived but was not the expected JSON.
    #[error("{0}")]
    Decode(String),
}

impl FetchError {
    /// Server errors, rate limiting and transport failures may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status(status) => {
                *status >= 500 || *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
            }
            FetchError::NotFound | FetchError::Timeout(_) | FetchError::Decode(_) => false,
        }
    }
}

/// Maps a response status to `Ok(())` for 2xx, or the matching error.
pub fn classify_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(FetchError::NotFound)
    } else {
        Err(FetchError::Status(status.as_u16()))
    }
}

/// Converts a reqwest error into a [`FetchError`], keeping its cause chain
/// in the message.
pub fn classify_error(error: &reqwest::Error) -> FetchError {
    if let Some(status) = error.status() {
        if let Err(e) = classify_status(status) {
            return e;
        }
    }

    let message = error_chain(error);
    if error.is_decode() {
        FetchError::Decode(message)
    } else if error.is_timeout() {
        FetchError::Timeout(format!("request timed out: {}", message))
    } else {
        FetchError::Transport(message)
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
