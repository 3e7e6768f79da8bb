//! BigQuery corpus store over the v2 REST API.
//!
//! Reads run a standard-SQL `SELECT DISTINCT` through `jobs.query`, then
//! follow `jobs.getQueryResults` until the job completes and every page has
//! been consumed. Appends stream rows with `tabledata.insertAll`.

use std::collections::HashSet;

use lexis_core::config::ColumnSet;
use lexis_core::errors::{LexisError, LexisResult, StorageError};
use lexis_core::models::{AppendOutcome, KeywordRecord};
use lexis_core::traits::ICorpusStore;
use lexis_storage::identifiers::{ensure_valid, quote_bigquery};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::transport::GcpHttpClient;

const BIGQUERY_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";
const QUERY_TIMEOUT_MS: u64 = 10_000;
const PAGE_SIZE: u32 = 10_000;
/// Upper bound on `getQueryResults` calls for one read.
const MAX_RESULT_CALLS: usize = 1_000;

/// A `project.dataset.table` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    /// Parse `project.dataset.table`, or `dataset.table` with a default project.
    pub fn parse(identifier: &str, default_project: Option<&str>) -> LexisResult<Self> {
        ensure_valid(identifier)?;
        let parts: Vec<&str> = identifier.split('.').collect();
        let invalid = |reason: &str| -> LexisError {
            StorageError::InvalidIdentifier {
                identifier: identifier.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty path segment"));
        }
        match parts.as_slice() {
            [project, dataset, table] => Ok(Self {
                project: project.to_string(),
                dataset: dataset.to_string(),
                table: table.to_string(),
            }),
            [dataset, table] => match default_project {
                Some(project) if !project.is_empty() => Ok(Self {
                    project: project.to_string(),
                    dataset: dataset.to_string(),
                    table: table.to_string(),
                }),
                _ => Err(invalid("dataset.table needs a project id")),
            },
            _ => Err(invalid("expected project.dataset.table")),
        }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}.{}", self.project, self.dataset, self.table)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: String,
    use_legacy_sql: bool,
    timeout_ms: u64,
    max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QueryResponse {
    job_complete: bool,
    job_reference: Option<JobReference>,
    rows: Vec<TableRow>,
    page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TableRow {
    f: Vec<TableCell>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TableCell {
    v: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllRequest {
    skip_invalid_rows: bool,
    ignore_unknown_values: bool,
    rows: Vec<InsertRow>,
}

#[derive(Debug, Serialize)]
struct InsertRow {
    json: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InsertAllResponse {
    insert_errors: Vec<RowInsertErrors>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RowInsertErrors {
    index: u64,
    errors: Vec<ErrorProto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorProto {
    reason: String,
    message: String,
}

/// Keyword corpus in a BigQuery table.
pub struct BigQueryCorpusStore {
    client: GcpHttpClient,
    default_project: Option<String>,
    location: Option<String>,
    base_url: String,
}

impl BigQueryCorpusStore {
    /// Initialize the client. Fails when no access token can be obtained.
    pub fn connect(
        client: GcpHttpClient,
        default_project: Option<String>,
        location: Option<String>,
    ) -> LexisResult<Self> {
        client.tokens().access_token().map_err(|e| StorageError::ConnectFailed {
            backend: "bigquery".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            default_project,
            location,
            base_url: BIGQUERY_URL.to_string(),
        })
    }

    /// Point at a different API root (emulators, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn job_project<'a>(&'a self, table: &'a TableRef) -> &'a str {
        self.default_project.as_deref().unwrap_or(&table.project)
    }

    fn results_url(
        &self,
        project: &str,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<String, String> {
        let mut params: Vec<(&str, String)> = vec![
            ("timeoutMs", QUERY_TIMEOUT_MS.to_string()),
            ("maxResults", PAGE_SIZE.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }
        if let Some(location) = job.location.as_deref().or(self.location.as_deref()) {
            params.push(("location", location.to_string()));
        }
        let url = format!("{}/projects/{}/queries/{}", self.base(), project, job.job_id);
        reqwest::Url::parse_with_params(&url, &params)
            .map(|u| u.to_string())
            .map_err(|e| format!("bad results url: {e}"))
    }
}

/// `SELECT DISTINCT` over one column, nulls excluded.
fn distinct_query(column: &str, table: &TableRef) -> LexisResult<String> {
    let column = quote_bigquery(column)?;
    let table = quote_bigquery(&table.qualified())?;
    Ok(format!(
        "SELECT DISTINCT {column} FROM {table} WHERE {column} IS NOT NULL"
    ))
}

/// First-cell string values of a result page.
fn collect_values(rows: &[TableRow], into: &mut HashSet<String>) {
    for row in rows {
        if let Some(Value::String(s)) = row.f.first().map(|c| &c.v) {
            into.insert(s.clone());
        }
    }
}

fn insert_row(record: &KeywordRecord, columns: &ColumnSet) -> InsertRow {
    let mut json = Map::new();
    json.insert(columns.keyword.clone(), Value::from(record.text()));
    if let Some(col) = &columns.category {
        json.insert(col.clone(), Value::from(record.category()));
    }
    if let Some(col) = &columns.description {
        json.insert(col.clone(), Value::from(record.description()));
    }
    InsertRow { json }
}

fn describe_insert_errors(errors: &[RowInsertErrors]) -> Vec<String> {
    errors
        .iter()
        .flat_map(|row| {
            row.errors
                .iter()
                .map(move |e| format!("row {}: {}: {}", row.index, e.reason, e.message))
        })
        .collect()
}

impl ICorpusStore for BigQueryCorpusStore {
    fn read_existing(&self, column: &str, table: &str) -> LexisResult<HashSet<String>> {
        let table_ref = TableRef::parse(table, self.default_project.as_deref())?;
        let project = self.job_project(&table_ref).to_string();
        let read_err = |reason: String| -> LexisError {
            StorageError::ReadFailed {
                table: table.to_string(),
                reason,
            }
            .into()
        };

        let request = QueryRequest {
            query: distinct_query(column, &table_ref)?,
            use_legacy_sql: false,
            timeout_ms: QUERY_TIMEOUT_MS,
            max_results: PAGE_SIZE,
            location: self.location.as_deref(),
        };
        let url = format!("{}/projects/{}/queries", self.base(), project);
        let mut page: QueryResponse = self.client.post_json(&url, &request)?;

        let mut values = HashSet::new();
        let mut calls = 0;
        loop {
            if page.job_complete {
                collect_values(&page.rows, &mut values);
                if page.page_token.is_none() {
                    break;
                }
            }
            let job = page
                .job_reference
                .as_ref()
                .ok_or_else(|| read_err("query response has no job reference".to_string()))?;
            calls += 1;
            if calls > MAX_RESULT_CALLS {
                return Err(read_err(format!(
                    "query did not finish after {MAX_RESULT_CALLS} result calls"
                )));
            }
            let token = if page.job_complete {
                page.page_token.as_deref()
            } else {
                None
            };
            let next_url = self.results_url(&project, job, token).map_err(read_err)?;
            debug!(job_id = %job.job_id, call = calls, "fetching query results");
            let next: QueryResponse = self.client.get_json(&next_url)?;
            page = QueryResponse {
                job_reference: next.job_reference.or(page.job_reference),
                ..next
            };
        }

        info!(table, column, count = values.len(), "loaded existing keywords");
        Ok(values)
    }

    fn append(
        &self,
        rows: &[KeywordRecord],
        columns: &ColumnSet,
        table: &str,
    ) -> LexisResult<AppendOutcome> {
        if rows.is_empty() {
            return Ok(AppendOutcome::success(0));
        }
        for name in columns.names() {
            ensure_valid(name)?;
        }
        let table_ref = TableRef::parse(table, self.default_project.as_deref())?;
        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            self.base(),
            table_ref.project,
            table_ref.dataset,
            table_ref.table
        );
        let request = InsertAllRequest {
            skip_invalid_rows: false,
            ignore_unknown_values: false,
            rows: rows.iter().map(|r| insert_row(r, columns)).collect(),
        };
        let resp: InsertAllResponse = self.client.post_json(&url, &request)?;

        if resp.insert_errors.is_empty() {
            info!(table, rows = rows.len(), "rows inserted");
            Ok(AppendOutcome::success(rows.len()))
        } else {
            let errors = describe_insert_errors(&resp.insert_errors);
            warn!(table, errors = errors.len(), "insertAll reported row errors");
            Ok(AppendOutcome::failure(errors))
        }
    }

    fn name(&self) -> &str {
        "bigquery"
    }
}
