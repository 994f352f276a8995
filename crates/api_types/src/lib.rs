use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod record {
    use super::*;

    /// Query for `GET /expenses` and `GET /incomes`.
    ///
    /// `date` lists one day; `from`/`to` an inclusive range. With neither,
    /// every record is returned.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecordList {
        pub date: Option<NaiveDate>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordNew {
        pub date: NaiveDate,
        pub description: String,
        /// Whole đồng, >= 0.
        pub amount: i64,
        /// Category code (`food`) or label (`Ăn uống`).
        pub category: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecordUpdate {
        pub date: Option<NaiveDate>,
        pub description: Option<String>,
        pub amount: Option<i64>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub description: String,
        pub amount: i64,
        pub category: String,
        pub category_label: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordListResponse {
        pub records: Vec<RecordView>,
    }
}

pub mod attendance {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceType {
        FullDay,
        HalfDay,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceQuery {
        /// `YYYY-MM`
        pub month: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceUpsert {
        pub date: NaiveDate,
        pub attendance_type: AttendanceType,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceView {
        pub date: NaiveDate,
        pub attendance_type: AttendanceType,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceListResponse {
        pub markings: Vec<AttendanceView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeakDay {
        /// `None` when the month has no spending.
        pub date: Option<NaiveDate>,
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseStats {
        pub month: String,
        pub total: i64,
        pub previous_total: i64,
        /// Percent; `0.0` when the previous month had no spending.
        pub change: f64,
        pub daily_average: f64,
        pub transaction_count: usize,
        pub peak_day: PeakDay,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryShare {
        pub category: String,
        pub label: String,
        pub total: i64,
        pub count: usize,
        pub share: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummary {
        pub month: String,
        pub total_expenses: i64,
        pub total_incomes: i64,
        pub balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryQuery {
        /// `YYYY-MM`; the current month when absent.
        pub anchor: Option<String>,
        pub months: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryRow {
        #[serde(flatten)]
        pub summary: MonthlySummary,
        pub expense_change: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub rows: Vec<HistoryRow>,
        pub total_incomes: i64,
        pub total_expenses: i64,
        pub total_balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthDetail {
        pub summary: MonthlySummary,
        pub expense_count: usize,
        pub income_count: usize,
        pub expenses: Vec<super::record::RecordView>,
        pub incomes: Vec<super::record::RecordView>,
        pub expense_breakdown: Vec<CategoryShare>,
        pub income_breakdown: Vec<CategoryShare>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarDay {
        pub date: NaiveDate,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarResponse {
        pub month: String,
        pub days: Vec<CalendarDay>,
    }
}

pub mod salary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryQuery {
        pub month: String,
        pub monthly_salary: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryEstimate {
        pub month: String,
        pub monthly_salary: i64,
        pub working_days: u32,
        pub worked_units: f64,
        pub full_days: usize,
        pub half_days: usize,
        pub daily_rate: f64,
        pub estimated_salary: f64,
    }
}

pub mod import {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvalidDate {
        Reject,
        Today,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ImportQuery {
        /// Overrides the server default for rows with unreadable times.
        pub invalid_date: Option<InvalidDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportResult {
        pub total: usize,
        pub success: usize,
        pub errors: Vec<String>,
    }
}
