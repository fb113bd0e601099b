use std::time::Duration;

use reqwest::{blocking::Client, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{config, warning};

pub type JsonPayload = serde_json::Value;

const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Failure of a single fetch, after any rate-limit retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limit exceeded for {url} after {attempts} attempts")]
    RateLimitExceeded { url: String, attempts: u32 },

    #[error("upstream returned {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Status, `Retry-After` header and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

/// Performs a single blocking GET. Implemented over `reqwest` in production
/// and by scripted fakes in tests.
pub trait HttpTransport: Send {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<RawResponse, FetchError>;
}

/// Blocks the calling thread during rate-limit backoff.
pub trait Sleeper: Send {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a blocking client. Must not be called from inside an async
    /// runtime worker; run it in `spawn_blocking`.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<RawResponse, FetchError> {
        let mut request = self.client.get(url).query(params);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Issues GET requests and honors 429 responses.
///
/// A 429 sleeps for the server-specified `Retry-After` (1 second when absent,
/// clamped to `max_wait`) and tries again, up to `max_retries` requests in
/// total. Any other non-200 status fails immediately without retrying.
pub struct RateLimitedFetcher {
    transport: Box<dyn HttpTransport>,
    sleeper: Box<dyn Sleeper>,
    max_retries: u32,
    max_wait: Duration,
}

impl RateLimitedFetcher {
    pub fn new(transport: Box<dyn HttpTransport>, sleeper: Box<dyn Sleeper>) -> Self {
        Self {
            transport,
            sleeper,
            max_retries: config::DEFAULT_MAX_RETRIES,
            max_wait: Duration::from_secs(config::DEFAULT_MAX_WAIT_SECS),
        }
    }

    /// Fetcher over a real HTTP client using the configured retry policy.
    pub fn from_config() -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(Box::new(transport), Box::new(ThreadSleeper))
            .with_policy(config::fetch_max_retries(), config::fetch_max_wait()))
    }

    pub fn with_policy(mut self, max_retries: u32, max_wait: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.max_wait = max_wait;
        self
    }

    pub fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<JsonPayload, FetchError> {
        for attempt in 1..=self.max_retries {
            let response = self.transport.get(url, headers, params)?;

            match response.status {
                200 => return parse_body(&response.body),
                429 => {
                    if attempt == self.max_retries {
                        break;
                    }
                    let wait = self.retry_wait(response.retry_after.as_deref());
                    warning!(
                        "Rate limited on {}. Retrying after {} seconds ({}/{})...",
                        url,
                        wait.as_secs(),
                        attempt,
                        self.max_retries
                    );
                    self.sleeper.sleep(wait);
                }
                status => {
                    return Err(FetchError::UpstreamError {
                        status,
                        body: response.body,
                    });
                }
            }
        }

        Err(FetchError::RateLimitExceeded {
            url: url.to_string(),
            attempts: self.max_retries,
        })
    }

    /// Fetches and deserializes the payload into `T`.
    pub fn fetch_as<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<T, FetchError> {
        let payload = self.fetch(url, headers, params)?;
        serde_json::from_value(payload).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }

    fn retry_wait(&self, retry_after: Option<&str>) -> Duration {
        let secs = retry_after
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        Duration::from_secs(secs).min(self.max_wait)
    }
}

fn parse_body(body: &str) -> Result<JsonPayload, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::MalformedResponse("empty body".to_string()));
    }
    serde_json::from_str(body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}
