//! Authenticated JSON client for Google Cloud REST APIs.
//!
//! Transport errors, 429 and 5xx responses are retried with doubling backoff.
//! Any other 4xx fails on the first attempt.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use lexis_core::errors::{CloudError, LexisError, LexisResult};

use crate::auth::TokenSource;

/// Retry and timeout settings.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    /// Attempts after the first.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

fn net_err(reason: impl Into<String>) -> LexisError {
    CloudError::Network {
        reason: reason.into(),
    }
    .into()
}

/// Whether a failed status is worth another attempt.
fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

pub struct GcpHttpClient {
    client: Client,
    config: HttpClientConfig,
    tokens: TokenSource,
}

impl GcpHttpClient {
    pub fn new(config: HttpClientConfig, tokens: TokenSource) -> LexisResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| net_err(format!("client build failed: {e}")))?;
        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenSource {
        &self.tokens
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> LexisResult<T> {
        self.execute(|client| client.request(Method::GET, url))
    }

    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> LexisResult<T> {
        self.execute(|client| client.request(Method::POST, url).json(body))
    }

    fn execute<T, F>(&self, build: F) -> LexisResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self.tokens.access_token()?;

        let mut delay = self.config.initial_backoff;
        let mut last_failure = String::from("no attempt made");
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying GCP request");
                std::thread::sleep(delay);
                delay = delay.saturating_mul(2).min(self.config.max_backoff);
            }

            let resp = match build(&self.client).bearer_auth(&token).send() {
                Ok(resp) => resp,
                Err(e) => {
                    last_failure = e.to_string();
                    continue;
                }
            };
            let status = resp.status();
            if status.is_success() {
                return resp.json::<T>().map_err(|e| {
                    CloudError::Decode {
                        reason: e.to_string(),
                    }
                    .into()
                });
            }
            let body = resp.text().unwrap_or_default();
            if !is_retryable(status) {
                return Err(CloudError::Rejected {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }
            last_failure = format!("HTTP {status}: {body}");
        }

        Err(net_err(format!(
            "gave up after {} attempts: {last_failure}",
            self.config.max_retries + 1
        )))
    }
}
