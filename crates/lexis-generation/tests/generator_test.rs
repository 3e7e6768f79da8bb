use lexis_core::config::GenerationConfig;
use lexis_core::errors::{GenerationError, LexisError};
use lexis_generation::{GenerationRequest, KeywordGenerator};
use test_fixtures::fakes::{FailingGenerator, ScriptedGenerator};
use test_fixtures::{load_response, response_from_pairs};

fn request(count: usize) -> GenerationRequest {
    GenerationRequest {
        count,
        ..GenerationRequest::from_config(&GenerationConfig::default())
    }
}

#[test]
fn generates_records_from_provider_output() {
    let provider = ScriptedGenerator::new(load_response("fenced_with_tag.txt"));
    let generator = KeywordGenerator::new(Box::new(provider.clone()));

    let outcome = generator.generate(&request(3));
    assert!(outcome.failure.is_none());
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(provider.calls(), 1);
}

#[test]
fn prompt_carries_request_parameters() {
    let provider = ScriptedGenerator::new("[]");
    let generator = KeywordGenerator::new(Box::new(provider.clone()));
    generator.generate(&request(12));

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Generate 12 relevant Hebrew keywords"));
    assert!(prompts[0].contains("\"instruments\""));
}

#[test]
fn fewer_records_than_requested_are_accepted() {
    let provider = ScriptedGenerator::new(response_from_pairs(&[("מניות", "instruments")]));
    let generator = KeywordGenerator::new(Box::new(provider));
    let outcome = generator.generate(&request(20));
    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.failure.is_none());
}

#[test]
fn provider_failure_yields_no_candidates() {
    let generator = KeywordGenerator::new(Box::new(FailingGenerator));
    let outcome = generator.generate(&request(5));
    assert!(outcome.records.is_empty());
    assert!(matches!(
        outcome.failure,
        Some(LexisError::Generation(GenerationError::RequestFailed { .. }))
    ));
}

#[test]
fn malformed_output_yields_no_candidates() {
    let generator = KeywordGenerator::new(Box::new(ScriptedGenerator::new("not json")));
    let outcome = generator.generate(&request(5));
    assert!(outcome.records.is_empty());
    assert!(matches!(
        outcome.failure,
        Some(LexisError::Generation(
            GenerationError::MalformedResponse { .. }
        ))
    ));
}

#[test]
fn all_invalid_elements_report_empty_response() {
    let generator =
        KeywordGenerator::new(Box::new(ScriptedGenerator::new(r#"[{"category":"x"}]"#)));
    let outcome = generator.generate(&request(1));
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.skipped, 1);
    assert!(matches!(
        outcome.failure,
        Some(LexisError::Generation(GenerationError::EmptyResponse))
    ));
}

#[test]
fn empty_array_is_not_a_failure() {
    let generator = KeywordGenerator::new(Box::new(ScriptedGenerator::new("[]")));
    let outcome = generator.generate(&request(1));
    assert!(outcome.records.is_empty());
    assert!(outcome.failure.is_none());
}
