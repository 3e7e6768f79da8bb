mod common;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use lexis_cloud::BigQueryCorpusStore;
use lexis_core::config::ColumnSet;
use lexis_core::errors::{CloudError, LexisError, StorageError};
use lexis_core::models::KeywordRecord;
use lexis_core::traits::ICorpusStore;
use serde_json::{json, Value};

use common::{client, serve, RequestLog};

const TABLE: &str = "p.telegram.keys";

fn store(base_url: &str) -> BigQueryCorpusStore {
    BigQueryCorpusStore::connect(client(), Some("p".to_string()), None)
        .unwrap()
        .with_base_url(base_url)
}

fn records(texts: &[&str]) -> Vec<KeywordRecord> {
    texts
        .iter()
        .map(|t| KeywordRecord::new(*t, Some("instruments".into()), None).unwrap())
        .collect()
}

// --- read_existing ---

#[test]
fn read_waits_for_job_then_follows_page_tokens() {
    let query_body = Arc::new(Mutex::new(Value::Null));
    let captured = query_body.clone();
    let app = Router::new()
        .route(
            "/projects/:project/queries",
            post(move |Json(body): Json<Value>| async move {
                *captured.lock().unwrap() = body;
                Json(json!({
                    "jobComplete": false,
                    "jobReference": {"projectId": "p", "jobId": "j1", "location": "EU"}
                }))
            }),
        )
        .route(
            "/projects/:project/queries/:job",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                match params.get("pageToken").map(String::as_str) {
                    None => Json(json!({
                        "jobComplete": true,
                        "rows": [{"f": [{"v": "a"}]}],
                        "pageToken": "t2"
                    })),
                    Some("t2") => Json(json!({
                        "jobComplete": true,
                        "rows": [{"f": [{"v": "b"}]}, {"f": [{"v": null}]}]
                    })),
                    Some(_) => Json(json!({"jobComplete": true})),
                }
            }),
        );
    let log = RequestLog::default();
    let base = serve(app, &log);

    let values = store(&base).read_existing("keys_group", TABLE).unwrap();
    assert_eq!(
        values,
        HashSet::from(["a".to_string(), "b".to_string()])
    );

    let requests = log.entries();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0], "POST /projects/p/queries");
    assert!(requests[1].starts_with("GET /projects/p/queries/j1?"));
    assert!(!requests[1].contains("pageToken"));
    assert!(requests[1].contains("location=EU"));
    assert!(requests[2].starts_with("GET /projects/p/queries/j1?"));
    assert!(requests[2].contains("pageToken=t2"));

    let body = query_body.lock().unwrap().clone();
    assert_eq!(body["useLegacySql"], false);
    assert_eq!(
        body["query"],
        "SELECT DISTINCT `keys_group` FROM `p.telegram.keys` WHERE `keys_group` IS NOT NULL"
    );
}

#[test]
fn single_complete_page_needs_no_result_calls() {
    let app = Router::new().route(
        "/projects/:project/queries",
        post(|| async {
            Json(json!({
                "jobComplete": true,
                "jobReference": {"projectId": "p", "jobId": "j1"},
                "rows": [{"f": [{"v": "מניות"}]}, {"f": [{"v": "תשואה"}]}]
            }))
        }),
    );
    let log = RequestLog::default();
    let base = serve(app, &log);

    let values = store(&base).read_existing("keys_group", TABLE).unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.contains("מניות"));
    assert_eq!(log.entries(), vec!["POST /projects/p/queries".to_string()]);
}

#[test]
fn incomplete_job_without_reference_is_read_failure() {
    let app = Router::new().route(
        "/projects/:project/queries",
        post(|| async { Json(json!({"jobComplete": false})) }),
    );
    let base = serve(app, &RequestLog::default());

    let err = store(&base).read_existing("keys_group", TABLE).unwrap_err();
    assert!(matches!(err, LexisError::Storage(StorageError::ReadFailed { .. })));
    assert!(!err.is_fatal());
}

#[test]
fn rejected_query_is_not_retried() {
    let app = Router::new().route(
        "/projects/:project/queries",
        post(|| async { (StatusCode::FORBIDDEN, "access denied") }),
    );
    let log = RequestLog::default();
    let base = serve(app, &log);

    let err = store(&base).read_existing("keys_group", TABLE).unwrap_err();
    assert!(matches!(
        err,
        LexisError::Cloud(CloudError::Rejected { status: 403, .. })
    ));
    assert!(!err.is_fatal());
    assert_eq!(log.entries().len(), 1);
}

#[test]
fn server_errors_are_retried_until_exhausted() {
    let app = Router::new().route(
        "/projects/:project/queries",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let log = RequestLog::default();
    let base = serve(app, &log);

    let err = store(&base).read_existing("keys_group", TABLE).unwrap_err();
    assert!(matches!(err, LexisError::Cloud(CloudError::Network { .. })));
    assert!(err.to_string().contains("gave up after 3 attempts"));
    assert_eq!(log.entries().len(), 3);
}

// --- append ---

fn insert_all_app(response: Value, body: Arc<Mutex<Value>>) -> Router {
    Router::new().route(
        "/projects/:project/datasets/:dataset/tables/:table/insertAll",
        post(move |Json(sent): Json<Value>| async move {
            *body.lock().unwrap() = sent;
            Json(response)
        }),
    )
}

#[test]
fn insert_errors_become_partial_errors() {
    let body = Arc::new(Mutex::new(Value::Null));
    let app = insert_all_app(
        json!({
            "kind": "bigquery#tableDataInsertAllResponse",
            "insertErrors": [
                {"index": 1, "errors": [{"reason": "invalid", "message": "no such field: category"}]}
            ]
        }),
        body.clone(),
    );
    let log = RequestLog::default();
    let base = serve(app, &log);

    let columns = ColumnSet {
        keyword: "keys_group".into(),
        category: Some("category".into()),
        description: None,
    };
    let outcome = store(&base)
        .append(&records(&["מניות", "תשואה"]), &columns, TABLE)
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.rows_written, 0);
    assert_eq!(
        outcome.partial_errors,
        vec!["row 1: invalid: no such field: category".to_string()]
    );
    assert_eq!(
        log.entries(),
        vec!["POST /projects/p/datasets/telegram/tables/keys/insertAll".to_string()]
    );

    let sent = body.lock().unwrap().clone();
    assert_eq!(sent["skipInvalidRows"], false);
    assert_eq!(sent["rows"].as_array().unwrap().len(), 2);
    assert_eq!(sent["rows"][0]["json"]["keys_group"], "מניות");
    assert_eq!(sent["rows"][1]["json"]["category"], "instruments");
}

#[test]
fn clean_insert_reports_every_row() {
    let body = Arc::new(Mutex::new(Value::Null));
    let app = insert_all_app(json!({"kind": "bigquery#tableDataInsertAllResponse"}), body);
    let base = serve(app, &RequestLog::default());

    let outcome = store(&base)
        .append(
            &records(&["מניות", "תשואה", "אג\"ח"]),
            &ColumnSet::keyword_only("keys_group"),
            TABLE,
        )
        .unwrap();
    assert!(outcome.ok);
    assert_eq!(outcome.rows_written, 3);
    assert!(outcome.partial_errors.is_empty());
}

#[test]
fn empty_batch_makes_no_request() {
    let log = RequestLog::default();
    let base = serve(Router::new(), &log);

    let outcome = store(&base)
        .append(&[], &ColumnSet::keyword_only("keys_group"), TABLE)
        .unwrap();
    assert!(outcome.ok);
    assert_eq!(outcome.rows_written, 0);
    assert!(log.entries().is_empty());
}
