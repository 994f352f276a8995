//! Expense and income API endpoints
//!
//! Both tables share these handlers; the router binds the kind.

use api_types::record::{RecordList, RecordListResponse, RecordNew, RecordUpdate, RecordView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Category, Money, MonetaryRecord, NewRecord, RecordKind, RecordPatch, RecordStore};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn record_view(record: MonetaryRecord) -> RecordView {
    RecordView {
        id: record.id,
        date: record.date,
        description: record.description,
        amount: record.amount.amount(),
        category: record.category.as_str().to_string(),
        category_label: record.category.label().to_string(),
        created_at: record.created_at,
    }
}

pub async fn list(
    kind: RecordKind,
    State(state): State<ServerState>,
    Query(query): Query<RecordList>,
) -> Result<Json<RecordListResponse>, ServerError> {
    let engine = &state.engine;

    let records = match (query.date, query.from, query.to) {
        (Some(date), None, None) => engine.query_by_date(kind, date).await?,
        (None, Some(from), Some(to)) => {
            if from > to {
                return Err(ServerError::Generic("from must not be after to".to_string()));
            }
            engine.query_by_date_range(kind, from, to).await?
        }
        (None, None, None) => engine.query_all(kind).await?,
        _ => {
            return Err(ServerError::Generic(
                "use either date or both from and to".to_string(),
            ));
        }
    };

    Ok(Json(RecordListResponse {
        records: records.into_iter().map(record_view).collect(),
    }))
}

pub async fn create(
    kind: RecordKind,
    State(state): State<ServerState>,
    Json(payload): Json<RecordNew>,
) -> Result<(StatusCode, Json<RecordView>), ServerError> {
    let record = NewRecord {
        date: payload.date,
        description: payload.description,
        amount: Money::new(payload.amount),
        category: Category::try_from(payload.category.as_str())?,
    };

    let stored = state.engine.insert(kind, record).await?;
    Ok((StatusCode::CREATED, Json(record_view(stored))))
}

pub async fn update(
    kind: RecordKind,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordUpdate>,
) -> Result<StatusCode, ServerError> {
    let patch = RecordPatch {
        date: payload.date,
        description: payload.description,
        amount: payload.amount.map(Money::new),
        category: payload
            .category
            .as_deref()
            .map(Category::try_from)
            .transpose()?,
    };

    state.engine.update(kind, id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    kind: RecordKind,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
