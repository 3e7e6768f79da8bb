use lexis_core::errors::*;

#[test]
fn configuration_error_carries_field_and_reason() {
    let err = LexisError::config("store.table", "must not be empty");
    let msg = err.to_string();
    assert!(msg.contains("store.table"));
    assert!(msg.contains("must not be empty"));
}

#[test]
fn setup_failures_are_fatal() {
    assert!(LexisError::config("x", "y").is_fatal());

    let cred: LexisError = CredentialError::SecretUnavailable {
        secret_id: "gemini-api-key".into(),
        reason: "permission denied".into(),
    }
    .into();
    assert!(cred.is_fatal());

    let connect: LexisError = StorageError::ConnectFailed {
        backend: "bigquery".into(),
        reason: "no token".into(),
    }
    .into();
    assert!(connect.is_fatal());
}

#[test]
fn stage_failures_are_recoverable() {
    let read: LexisError = StorageError::ReadFailed {
        table: "t".into(),
        reason: "timeout".into(),
    }
    .into();
    assert!(!read.is_fatal());

    let write: LexisError = StorageError::WriteFailed {
        table: "t".into(),
        reason: "quota".into(),
    }
    .into();
    assert!(!write.is_fatal());

    let gen: LexisError = GenerationError::RequestFailed {
        provider: "gemini".into(),
        reason: "429".into(),
    }
    .into();
    assert!(!gen.is_fatal());

    let malformed: LexisError = GenerationError::MalformedResponse {
        reason: "not a list".into(),
    }
    .into();
    assert!(!malformed.is_fatal());

    let network: LexisError = CloudError::Network {
        reason: "connection reset".into(),
    }
    .into();
    assert!(!network.is_fatal());
}

// --- From impls ---

#[test]
fn storage_error_converts_to_lexis_error() {
    let err: LexisError = StorageError::Sqlite {
        message: "disk full".into(),
    }
    .into();
    assert!(matches!(err, LexisError::Storage(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn serialization_error_converts_to_lexis_error() {
    let json_err = serde_json::from_str::<String>("not valid json").unwrap_err();
    let err: LexisError = json_err.into();
    assert!(matches!(err, LexisError::Serialization(_)));
}

#[test]
fn cloud_error_converts_to_lexis_error() {
    let err: LexisError = CloudError::Rejected {
        status: 403,
        body: "permission denied".into(),
    }
    .into();
    assert!(matches!(err, LexisError::Cloud(CloudError::Rejected { status: 403, .. })));
    assert!(err.to_string().contains("HTTP 403"));
}

#[test]
fn secret_error_carries_secret_id() {
    let err = CredentialError::SecretUnavailable {
        secret_id: "gemini-api-key".into(),
        reason: "not found".into(),
    };
    assert!(err.to_string().contains("gemini-api-key"));
}
