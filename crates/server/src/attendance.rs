//! Attendance API endpoints

use api_types::attendance::{
    AttendanceListResponse, AttendanceQuery, AttendanceType, AttendanceUpsert, AttendanceView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use engine::{AttendanceKind, AttendanceMarking, Month, RecordStore};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: AttendanceKind) -> AttendanceType {
    match kind {
        AttendanceKind::FullDay => AttendanceType::FullDay,
        AttendanceKind::HalfDay => AttendanceType::HalfDay,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<AttendanceListResponse>, ServerError> {
    let month: Month = query.month.parse()?;
    let markings = state
        .engine
        .attendance_between(month.first_day(), month.last_day())
        .await?;

    Ok(Json(AttendanceListResponse {
        markings: markings
            .into_iter()
            .map(|m| AttendanceView {
                date: m.date,
                attendance_type: map_kind(m.kind),
            })
            .collect(),
    }))
}

pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<AttendanceUpsert>,
) -> Result<StatusCode, ServerError> {
    let kind = match payload.attendance_type {
        AttendanceType::FullDay => AttendanceKind::FullDay,
        AttendanceType::HalfDay => AttendanceKind::HalfDay,
    };
    let marking = AttendanceMarking::new(payload.date, kind)?;
    state.engine.upsert_attendance(marking).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(date): Path<NaiveDate>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_attendance(date).await?;
    Ok(StatusCode::NO_CONTENT)
}
