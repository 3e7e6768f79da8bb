//! Test fixture loader and deterministic fakes for the lexis workspace.
//!
//! Fixture files live under `test-fixtures/responses/` and hold raw model
//! responses. The fakes stand in for the model, the corpus store, and the
//! secret store so pipeline runs are reproducible.

pub mod fakes;

use std::path::PathBuf;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    loop {
        if path.join("test-fixtures").join("responses").exists() {
            return path.join("test-fixtures");
        }
        if path.join("responses").exists() && path.ends_with("test-fixtures") {
            return path;
        }
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
}

/// Load a raw model response fixture as text.
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_response(name: &str) -> String {
    let path = fixtures_root().join("responses").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Load a response fixture and decode it as JSON.
pub fn load_response_value(name: &str) -> serde_json::Value {
    let content = load_response(name);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", name, e))
}

/// Render `(keyword, category)` pairs as a model response.
pub fn response_from_pairs(pairs: &[(&str, &str)]) -> String {
    let items: Vec<serde_json::Value> = pairs
        .iter()
        .map(|(keyword, category)| serde_json::json!({"keyword": keyword, "category": category}))
        .collect();
    serde_json::Value::Array(items).to_string()
}
