//! KeywordGenerator: prompt in, validated records out.
//!
//! A failing provider or an unusable response never surfaces as an error:
//! the outcome carries zero records and the cause, and the caller treats it
//! as "no candidates this run".

use lexis_core::errors::{GenerationError, LexisError};
use lexis_core::models::KeywordRecord;
use lexis_core::traits::ITextGenerator;
use tracing::{info, warn};

use crate::parser;
use crate::prompt::{build_prompt, GenerationRequest};

/// Candidates from one generation call.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    /// Valid records in model order. May be shorter or longer than requested.
    pub records: Vec<KeywordRecord>,
    /// Response elements dropped by validation.
    pub skipped: usize,
    /// Why no records were produced, when that happened because of a failure.
    pub failure: Option<LexisError>,
}

/// Composes the generation request and delegates to a text generator.
pub struct KeywordGenerator {
    provider: Box<dyn ITextGenerator>,
}

impl KeywordGenerator {
    pub fn new(provider: Box<dyn ITextGenerator>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Ask the model for `request.count` keywords and parse its answer.
    pub fn generate(&self, request: &GenerationRequest) -> GenerationOutcome {
        let prompt = build_prompt(request);
        info!(
            provider = self.provider.name(),
            count = request.count,
            topic = %request.topic,
            language = %request.language,
            "requesting keywords"
        );

        let raw = match self.provider.generate(&prompt) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "generation failed");
                return GenerationOutcome {
                    failure: Some(e),
                    ..Default::default()
                };
            }
        };

        let parsed = parser::parse_detailed(&raw);
        if let Some(err) = parsed.error {
            return GenerationOutcome {
                skipped: parsed.skipped,
                failure: Some(err.into()),
                ..Default::default()
            };
        }

        if parsed.records.is_empty() {
            warn!(skipped = parsed.skipped, "model returned no usable keywords");
            let failure = (parsed.skipped > 0).then(|| GenerationError::EmptyResponse.into());
            return GenerationOutcome {
                records: Vec::new(),
                skipped: parsed.skipped,
                failure,
            };
        }

        if parsed.records.len() != request.count {
            info!(
                requested = request.count,
                received = parsed.records.len(),
                "model returned a different number of keywords than requested"
            );
        }
        info!(
            generated = parsed.records.len(),
            skipped = parsed.skipped,
            "keywords generated"
        );

        GenerationOutcome {
            records: parsed.records,
            skipped: parsed.skipped,
            failure: None,
        }
    }
}
