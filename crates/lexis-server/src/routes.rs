//! HTTP trigger: `GET /` readiness, `POST /` one run.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use lexis_core::constants::{SERVICE_NAME, VERSION};
use lexis_core::RunReport;
use lexis_pipeline::DedupPipeline;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

/// Shared state for the trigger.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DedupPipeline>,
}

/// Body of a `POST /` response.
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TriggerResponse {
    fn ok() -> Self {
        Self {
            status: "OK",
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "Error",
            message: Some(message.into()),
        }
    }
}

/// Fixed readiness payload.
pub fn health_payload() -> Value {
    json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": VERSION,
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health).post(trigger))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(health_payload())
}

/// A run that could not persist its new keywords is reported as an error.
fn insert_failure_message(report: &RunReport) -> String {
    let detail = report
        .degradations
        .iter()
        .rev()
        .find(|e| e.component == "corpus")
        .map(|e| e.failure.as_str())
        .unwrap_or("append rejected");
    format!("run {}: keyword insert failed: {detail}", report.run_id)
}

async fn trigger(State(state): State<AppState>) -> (StatusCode, Json<TriggerResponse>) {
    let pipeline = Arc::clone(&state.pipeline);
    let joined = tokio::task::spawn_blocking(move || pipeline.run()).await;

    match joined {
        Ok(Ok(report)) if report.summary.insertion_succeeded => {
            info!(run_id = %report.run_id, "trigger run completed");
            (StatusCode::OK, Json(TriggerResponse::ok()))
        }
        Ok(Ok(report)) => {
            let message = insert_failure_message(&report);
            error!(run_id = %report.run_id, "{message}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TriggerResponse::error(message)),
            )
        }
        Ok(Err(aborted)) => {
            error!(run_id = %aborted.report.run_id, error = %aborted.error, "trigger run aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TriggerResponse::error(aborted.error.to_string())),
            )
        }
        Err(e) => {
            error!(error = %e, "run worker failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TriggerResponse::error(format!("run worker failed: {e}"))),
            )
        }
    }
}
