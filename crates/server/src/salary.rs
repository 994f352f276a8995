use api_types::salary::{SalaryEstimate, SalaryQuery};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{Money, Month};

use crate::{ServerError, server::ServerState};

/// Prorated salary for the attendance of a month.
pub async fn estimate(
    State(state): State<ServerState>,
    Query(query): Query<SalaryQuery>,
) -> Result<Json<SalaryEstimate>, ServerError> {
    let month: Month = query.month.parse()?;
    let estimate = state
        .engine
        .salary_estimate(month, Money::new(query.monthly_salary))
        .await?;

    Ok(Json(SalaryEstimate {
        month: estimate.month.to_string(),
        monthly_salary: estimate.monthly_salary.amount(),
        working_days: estimate.working_days,
        worked_units: estimate.worked_units,
        full_days: estimate.full_days,
        half_days: estimate.half_days,
        daily_rate: estimate.daily_rate,
        estimated_salary: estimate.estimated_salary,
    }))
}
