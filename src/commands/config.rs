use std::time::Duration;

use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    http::{HttpClient, RETRY_DELAY_MS, RetryPolicy},
    registry::{DEFAULT_INDEX_URL, PyPiRegistry, Registry},
    runtime::Runtime,
};

/// Default per-lookup timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Bearer token for private indexes.
pub const INDEX_TOKEN_ENV: &str = "PYDEPS_INDEX_TOKEN";

/// Network settings collected from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub index_url: Option<String>,
    pub timeout: Duration,
    pub retries: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: crate::http::MAX_RETRIES,
        }
    }
}

pub struct Config<R: Runtime, G: Registry> {
    pub runtime: R,
    pub registry: G,
}

impl<R: Runtime> Config<R, PyPiRegistry> {
    pub fn new(runtime: R, settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(token) = runtime.env_var(INDEX_TOKEN_ENV) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using {} for authentication", INDEX_TOKEN_ENV);
        }

        let client = Client::builder()
            .user_agent(concat!("pydeps/", env!("PYDEPS_VERSION")))
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        let retry = RetryPolicy::new(settings.retries, Duration::from_millis(RETRY_DELAY_MS));
        let http_client = HttpClient::new(client).with_retry_policy(retry);
        let index_url = settings.index_url.as_deref().unwrap_or(DEFAULT_INDEX_URL);
        debug!(
            "Using index {} (timeout {:?}, {} attempt(s))",
            index_url, settings.timeout, retry.max_attempts
        );

        Ok(Self {
            runtime,
            registry: PyPiRegistry::from_http_client(http_client, index_url),
        })
    }
}
