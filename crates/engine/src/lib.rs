pub use aggregation::{
    CategoryShare, ExpenseStats, History, HistoryRow, MonthDetail, MonthlySummary, PeakDay,
};
pub use attendance::{AttendanceKind, AttendanceMarking};
pub use dates::{DEFAULT_TIMEZONE, Month, is_sunday, local_date, today};
pub use error::EngineError;
pub use import::{ImportError, ImportOptions, ImportReport, ImportRow, InvalidDatePolicy};
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use records::{Category, MonetaryRecord, NewRecord, RecordKind, RecordPatch};
pub use salary::{SalaryEstimate, estimate_salary};
pub use store::RecordStore;

pub mod aggregation;
pub mod import;

mod attendance;
mod dates;
mod error;
mod expenses;
mod incomes;
mod money;
mod ops;
mod records;
mod salary;
mod store;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
