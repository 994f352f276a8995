//! Bulk expense import endpoint

use api_types::import::{ImportQuery, ImportResult, InvalidDate};
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use engine::{
    ImportOptions, InvalidDatePolicy,
    import::{import_expenses, read_csv, read_workbook},
};

use crate::{ServerError, server::ServerState};

fn is_csv(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("text/csv"))
}

/// Reads the request body as a workbook, or as CSV when sent as `text/csv`,
/// and stores its expense rows.
pub async fn upload(
    State(state): State<ServerState>,
    Query(query): Query<ImportQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImportResult>, ServerError> {
    let rows = if is_csv(&headers) {
        read_csv(&body)?
    } else {
        read_workbook(&body)?
    };

    let policy = match query.invalid_date {
        Some(InvalidDate::Reject) => InvalidDatePolicy::Reject,
        Some(InvalidDate::Today) => InvalidDatePolicy::Today,
        None => state.options.invalid_date,
    };
    let options = ImportOptions::new(policy, state.options.timezone);

    let report = import_expenses(state.engine.as_ref(), &rows, &options).await;
    Ok(Json(ImportResult {
        total: report.total,
        success: report.success,
        errors: report.errors,
    }))
}
