//! Gemini `generateContent` provider.
//!
//! Blocking HTTP client with retry and exponential backoff. Transport errors,
//! 429 and 5xx responses are retried; other 4xx responses fail immediately.

use std::time::Duration;

use lexis_core::config::GenerationConfig;
use lexis_core::errors::{GenerationError, LexisError, LexisResult};
use lexis_core::traits::{IGeneratorFactory, ITextGenerator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Gemini text generation over REST.
pub struct GeminiProvider {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
    api_key: String,
    max_retries: u32,
}

impl GeminiProvider {
    /// Create a provider for `config.model` at `config.endpoint`.
    pub fn new(api_key: &str, config: &GenerationConfig) -> LexisResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| request_err(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            model: config.model.clone(),
            api_key: api_key.to_string(),
            max_retries: config.max_retries,
        })
    }

    fn send_once(&self, body: &GenerateRequest<'_>) -> Result<GenerateResponse, Attempt> {
        let resp = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| Attempt::Retryable(format!("HTTP error: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<GenerateResponse>()
                .map_err(|e| Attempt::Fatal(format!("response decode failed: {e}")));
        }

        let body_text = resp.text().unwrap_or_default();
        let reason = format!("API returned {status}: {body_text}");
        if status.is_server_error() || status.as_u16() == 429 {
            Err(Attempt::Retryable(reason))
        } else {
            Err(Attempt::Fatal(reason))
        }
    }
}

/// Outcome of a single failed attempt.
enum Attempt {
    Retryable(String),
    Fatal(String),
}

impl ITextGenerator for GeminiProvider {
    fn generate(&self, prompt: &str) -> LexisResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut backoff = INITIAL_BACKOFF;
        let mut last_err = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(attempt, ?backoff, "retrying generation request");
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }

            match self.send_once(&body) {
                Ok(response) => return extract_text(response),
                Err(Attempt::Fatal(reason)) => return Err(request_err(reason)),
                Err(Attempt::Retryable(reason)) => {
                    warn!(attempt, error = %reason, "generation request failed");
                    last_err = reason;
                }
            }
        }

        Err(request_err(format!(
            "all {} retries exhausted: {last_err}",
            self.max_retries
        )))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> LexisResult<String> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(request_err(format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        debug!(finish_reason = ?candidate.finish_reason, "candidate carried no text");
        return Err(GenerationError::EmptyResponse.into());
    }
    Ok(text)
}

fn request_err(reason: String) -> LexisError {
    GenerationError::RequestFailed {
        provider: "gemini".to_string(),
        reason,
    }
    .into()
}

/// Builds [`GeminiProvider`]s for the pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeminiFactory;

impl IGeneratorFactory for GeminiFactory {
    fn build(
        &self,
        api_key: &str,
        config: &GenerationConfig,
    ) -> LexisResult<Box<dyn ITextGenerator>> {
        Ok(Box::new(GeminiProvider::new(api_key, config)?))
    }
}
