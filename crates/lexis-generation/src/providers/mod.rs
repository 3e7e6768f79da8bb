//! Text generation providers.

mod gemini_provider;

pub use gemini_provider::{GeminiFactory, GeminiProvider};
