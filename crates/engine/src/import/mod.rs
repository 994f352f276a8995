//! Bulk import of expenses from spreadsheet rows.
//!
//! Rows are committed one at a time. A failing row is recorded in the
//! report and never rolls back the rows before it.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{EngineError, Money, NewRecord, RecordKind, RecordStore, dates};

mod normalize;
mod sources;

pub use sources::{read_csv, read_workbook};

/// Description used when a row carries no note.
pub const DEFAULT_DESCRIPTION: &str = "Chi tiêu";

/// File-level import failures. Row failures end up in
/// [`ImportReport::errors`] instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("cannot read workbook: {0}")]
    Workbook(String),
    #[error("cannot read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("the file has no data rows")]
    Empty,
}

/// Raw cells of one row, in column order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportRow {
    pub amount: String,
    pub kind: String,
    pub time: String,
    pub note: String,
}

/// What to do with a row whose time cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDatePolicy {
    /// Fail the row.
    Reject,
    /// Date the row today.
    #[default]
    Today,
}

impl fmt::Display for InvalidDatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reject => "reject",
            Self::Today => "today",
        })
    }
}

impl FromStr for InvalidDatePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reject" => Ok(Self::Reject),
            "today" => Ok(Self::Today),
            other => Err(EngineError::InvalidField(format!(
                "invalid date policy: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    pub invalid_date: InvalidDatePolicy,
    pub timezone: Tz,
    /// Fallback date for [`InvalidDatePolicy::Today`].
    pub today: NaiveDate,
}

impl ImportOptions {
    pub fn new(invalid_date: InvalidDatePolicy, timezone: Tz) -> Self {
        Self {
            invalid_date,
            timezone,
            today: dates::today(timezone),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Expense rows considered; other row types are not counted.
    pub total: usize,
    pub success: usize,
    pub errors: Vec<String>,
}

/// Stores every `expense` row through `store`.
///
/// Rows of any other type are skipped silently.
pub async fn import_expenses<S>(
    store: &S,
    rows: &[ImportRow],
    options: &ImportOptions,
) -> ImportReport
where
    S: RecordStore + ?Sized,
{
    let mut report = ImportReport::default();

    for row in rows.iter().filter(|r| r.kind == RecordKind::Expense.as_str()) {
        report.total += 1;
        let record = match to_new_record(row, options) {
            Ok(record) => record,
            Err(reason) => {
                warn!(note = %row.note, %reason, "import row rejected");
                report.errors.push(reason);
                continue;
            }
        };

        match store.insert(RecordKind::Expense, record).await {
            Ok(_) => report.success += 1,
            Err(err) => {
                warn!(note = %row.note, error = %err, "import row not stored");
                report
                    .errors
                    .push(format!("import failed: {} - {err}", row.note));
            }
        }
    }

    info!(
        total = report.total,
        success = report.success,
        errors = report.errors.len(),
        "expense import finished"
    );
    report
}

fn to_new_record(row: &ImportRow, options: &ImportOptions) -> Result<NewRecord, String> {
    let amount = Money::parse_lenient(&row.amount);
    if !amount.is_positive() {
        return Err(format!("invalid amount: {}", row.amount));
    }

    let date = match normalize::parse_time(&row.time, options.timezone) {
        Some(date) => date,
        None => match options.invalid_date {
            InvalidDatePolicy::Today => options.today,
            InvalidDatePolicy::Reject => {
                return Err(format!("invalid time: {} - {}", row.note, row.time));
            }
        },
    };

    let note = row.note.trim();
    let description = if note.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        note.to_string()
    };

    Ok(NewRecord {
        date,
        category: normalize::classify_note(note),
        description,
        amount,
    })
}
