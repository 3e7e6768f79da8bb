//! Generation prompt construction.

use lexis_core::config::GenerationConfig;

/// What to ask the model for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub count: usize,
    pub topic: String,
    pub language: String,
    pub categories: Vec<String>,
}

impl GenerationRequest {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            count: config.count,
            topic: config.topic.clone(),
            language: config.language.clone(),
            categories: config.categories.clone(),
        }
    }
}

/// Render the instruction text sent to the model.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let GenerationRequest {
        count,
        topic,
        language,
        categories,
    } = request;

    let taxonomy = if categories.is_empty() {
        "\"general\"".to_string()
    } else {
        categories
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "You are an expert in the {topic} industry and in the {language} language.\n\
         Generate {count} relevant {language} keywords related to the {topic} industry.\n\
         \n\
         Requirements:\n\
         1. Keywords must be in {language}.\n\
         2. Include a mix of basic and advanced terms.\n\
         3. Each keyword should be commonly used in professional discussions of {topic}.\n\
         4. Categorize each keyword with exactly one of: {taxonomy}.\n\
         5. Give each keyword a brief description in {language}.\n\
         \n\
         Answer with a JSON array of objects, where each object has:\n\
         - \"keyword\": the keyword\n\
         - \"category\": the category it belongs to\n\
         - \"description\": a short explanation\n\
         \n\
         Example format:\n\
         [\n  {{\"keyword\": \"...\", \"category\": \"...\", \"description\": \"...\"}}\n]\n\
         \n\
         Generate exactly {count} keywords.\n"
    )
}
