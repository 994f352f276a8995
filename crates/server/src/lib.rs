use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, ImportError};

use serde::Serialize;
pub use server::{ServerOptions, ServerState, router, run_with_listener};

mod attendance;
mod import;
mod records;
mod reports;
mod salary;
mod server;

pub mod types {
    pub mod record {
        pub use api_types::record::{
            RecordList, RecordListResponse, RecordNew, RecordUpdate, RecordView,
        };
    }

    pub mod attendance {
        pub use api_types::attendance::{
            AttendanceListResponse, AttendanceQuery, AttendanceType, AttendanceUpsert,
            AttendanceView,
        };
    }

    pub mod stats {
        pub use api_types::stats::{
            CalendarDay, CalendarResponse, CategoryShare, ExpenseStats, HistoryQuery,
            HistoryResponse, HistoryRow, MonthDetail, MonthlySummary, PeakDay,
        };
    }

    pub mod salary {
        pub use api_types::salary::{SalaryEstimate, SalaryQuery};
    }

    pub mod import {
        pub use api_types::import::{ImportQuery, ImportResult, InvalidDate};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Import(ImportError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidField(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Import(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ImportError> for ServerError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}
