mod common;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lexis_cloud::SecretManagerStore;
use lexis_core::errors::{CredentialError, LexisError};
use lexis_core::traits::ISecretStore;
use serde_json::json;

use common::{client, serve, RequestLog};

fn secret_app(value: &'static str) -> Router {
    Router::new().route(
        "/projects/:project/secrets/:secret/versions/:version",
        get(
            move |Path((project, secret, version)): Path<(String, String, String)>,
                  headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer test-token");
                if !authorized {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                if secret != "gemini-api-key" {
                    return Err(StatusCode::NOT_FOUND);
                }
                Ok(Json(json!({
                    "name": format!("projects/{project}/secrets/{secret}/versions/{version}"),
                    "payload": {"data": STANDARD.encode(value)}
                })))
            },
        ),
    )
}

#[test]
fn secret_payload_is_decoded() {
    let log = RequestLog::default();
    let base = serve(secret_app("AIza-local-key\n"), &log);
    let store = SecretManagerStore::new(client(), "proj-1", "latest").with_base_url(&base);

    assert_eq!(store.get_secret("gemini-api-key").unwrap(), "AIza-local-key");
    assert_eq!(
        log.entries(),
        vec!["GET /projects/proj-1/secrets/gemini-api-key/versions/latest:access".to_string()]
    );
}

#[test]
fn pinned_version_is_requested() {
    let log = RequestLog::default();
    let base = serve(secret_app("מפתח"), &log);
    let store = SecretManagerStore::new(client(), "proj-1", "7").with_base_url(&base);

    assert_eq!(store.get_secret("gemini-api-key").unwrap(), "מפתח");
    assert!(log.entries()[0].ends_with("/versions/7:access"));
}

#[test]
fn missing_secret_is_fatal_credential_error() {
    let log = RequestLog::default();
    let base = serve(secret_app("unused"), &log);
    let store = SecretManagerStore::new(client(), "proj-1", "latest").with_base_url(&base);

    let err = store.get_secret("other-secret").unwrap_err();
    assert!(matches!(
        err,
        LexisError::Credential(CredentialError::SecretUnavailable { ref secret_id, .. })
            if secret_id == "other-secret"
    ));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("404"));
    assert_eq!(log.entries().len(), 1);
}
