use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::constants::DEFAULT_CATEGORY;

/// A generated keyword.
///
/// Identity is the exact `text`: no case folding, diacritic stripping, or
/// whitespace normalization. Two records with the same text are equal even
/// when their category or description differ. Records are immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordRecord {
    #[serde(rename = "keyword")]
    text: String,
    category: String,
    description: String,
}

impl KeywordRecord {
    /// Build a record. Returns `None` when `text` is empty.
    ///
    /// A missing or empty category becomes `"general"`; a missing
    /// description becomes the empty string.
    pub fn new(
        text: impl Into<String>,
        category: Option<String>,
        description: Option<String>,
    ) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        let category = category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        Some(Self {
            text,
            category,
            description: description.unwrap_or_default(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for KeywordRecord {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for KeywordRecord {}

impl Hash for KeywordRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}
