use crate::config::GenerationConfig;
use crate::errors::LexisResult;

/// Opaque language-model capability: prompt in, raw text out.
pub trait ITextGenerator: Send + Sync {
    /// Produce raw text for a prompt.
    fn generate(&self, prompt: &str) -> LexisResult<String>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

/// Builds a text generator once the API key is known.
pub trait IGeneratorFactory: Send + Sync {
    fn build(
        &self,
        api_key: &str,
        config: &GenerationConfig,
    ) -> LexisResult<Box<dyn ITextGenerator>>;
}
