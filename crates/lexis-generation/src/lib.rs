//! # lexis-generation
//!
//! Turns a generation request into validated keyword records:
//! prompt construction, the model provider, and response parsing.

pub mod generator;
pub mod parser;
pub mod prompt;
pub mod providers;

pub use generator::{GenerationOutcome, KeywordGenerator};
pub use parser::{parse, parse_detailed, ParsedResponse};
pub use prompt::{build_prompt, GenerationRequest};
pub use providers::{GeminiFactory, GeminiProvider};
