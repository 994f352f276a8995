//! Attendance based salary estimate.

use serde::{Deserialize, Serialize};

use crate::{AttendanceKind, AttendanceMarking, Money, Month};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalaryEstimate {
    pub month: Month,
    pub monthly_salary: Money,
    /// Non-Sunday days of the month.
    pub working_days: u32,
    /// Full days count 1.0, half days 0.5.
    pub worked_units: f64,
    pub full_days: usize,
    pub half_days: usize,
    pub daily_rate: f64,
    pub estimated_salary: f64,
}

/// Prorates `monthly_salary` over the working days of `month` and pays the
/// units actually worked.
///
/// Markings outside `month` are ignored. A non-positive salary gives a zero
/// daily rate.
pub fn estimate_salary(
    markings: &[AttendanceMarking],
    month: Month,
    monthly_salary: Money,
) -> SalaryEstimate {
    let working_days = month.working_days();
    let in_month: Vec<&AttendanceMarking> =
        markings.iter().filter(|m| month.contains(m.date)).collect();

    let worked_units: f64 = in_month.iter().map(|m| m.kind.weight()).sum();
    let full_days = in_month
        .iter()
        .filter(|m| m.kind == AttendanceKind::FullDay)
        .count();

    let daily_rate = if monthly_salary.is_positive() && working_days > 0 {
        monthly_salary.as_f64() / f64::from(working_days)
    } else {
        0.0
    };

    SalaryEstimate {
        month,
        monthly_salary,
        working_days,
        worked_units,
        full_days,
        half_days: in_month.len() - full_days,
        daily_rate,
        estimated_salary: daily_rate * worked_units,
    }
}
