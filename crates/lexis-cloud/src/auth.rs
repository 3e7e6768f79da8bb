//! Google Cloud access tokens.
//!
//! A static token from configuration, or the instance metadata server's
//! default service account token, cached until shortly before it expires.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use lexis_core::config::CredentialsConfig;
use lexis_core::errors::{CredentialError, LexisResult};
use serde::Deserialize;
use tracing::debug;

/// Default service-account token endpoint on the metadata server.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before the server-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

enum Source {
    Static(String),
    Metadata {
        url: String,
        client: reqwest::blocking::Client,
        cache: Mutex<Option<CachedToken>>,
    },
}

/// Supplies bearer tokens for Google Cloud APIs.
pub struct TokenSource {
    source: Source,
}

impl TokenSource {
    /// Always hand out `token`.
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            source: Source::Static(token.into()),
        }
    }

    /// Fetch tokens from a metadata server at `url`.
    pub fn metadata(url: impl Into<String>) -> LexisResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| token_err(format!("client build failed: {e}")))?;
        Ok(Self {
            source: Source::Metadata {
                url: url.into(),
                client,
                cache: Mutex::new(None),
            },
        })
    }

    /// Static token if configured, otherwise the metadata server.
    pub fn from_config(config: &CredentialsConfig) -> LexisResult<Self> {
        match &config.access_token {
            Some(token) if !token.trim().is_empty() => Ok(Self::fixed(token.trim())),
            _ => Self::metadata(METADATA_TOKEN_URL),
        }
    }

    /// A valid bearer token.
    pub fn access_token(&self) -> LexisResult<String> {
        match &self.source {
            Source::Static(token) => Ok(token.clone()),
            Source::Metadata { url, client, cache } => {
                let mut cache = cache
                    .lock()
                    .map_err(|e| token_err(format!("token cache poisoned: {e}")))?;
                if let Some(cached) = cache.as_ref() {
                    if Instant::now() < cached.refresh_at {
                        return Ok(cached.token.clone());
                    }
                }

                debug!("fetching access token from metadata server");
                let fetched = fetch_metadata_token(client, url)?;
                let lifetime = Duration::from_secs(fetched.expires_in).saturating_sub(EXPIRY_MARGIN);
                *cache = Some(CachedToken {
                    token: fetched.access_token.clone(),
                    refresh_at: Instant::now() + lifetime,
                });
                Ok(fetched.access_token)
            }
        }
    }
}

fn fetch_metadata_token(client: &reqwest::blocking::Client, url: &str) -> LexisResult<MetadataToken> {
    let resp = client
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .map_err(|e| token_err(format!("metadata server unreachable: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(token_err(format!("metadata server returned {status}")));
    }
    resp.json::<MetadataToken>()
        .map_err(|e| token_err(format!("token decode failed: {e}")))
}

fn token_err(reason: String) -> lexis_core::LexisError {
    CredentialError::TokenUnavailable { reason }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_token_is_returned_verbatim() {
        let source = TokenSource::fixed("ya29.abc");
        assert_eq!(source.access_token().unwrap(), "ya29.abc");
    }

    #[test]
    fn config_token_wins_over_metadata() {
        let config = CredentialsConfig {
            access_token: Some("  ya29.cfg ".to_string()),
            ..Default::default()
        };
        let source = TokenSource::from_config(&config).unwrap();
        assert_eq!(source.access_token().unwrap(), "ya29.cfg");
    }

    #[test]
    fn unreachable_metadata_server_is_credential_error() {
        let source = TokenSource::metadata("http://127.0.0.1:9/token").unwrap();
        let err = source.access_token().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("access token unavailable"));
    }

    #[test]
    fn metadata_token_shape() {
        let token: MetadataToken = serde_json::from_str(
            r#"{"access_token":"ya29.x","expires_in":3599,"token_type":"Bearer"}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "ya29.x");
        assert_eq!(token.expires_in, 3599);
    }
}
