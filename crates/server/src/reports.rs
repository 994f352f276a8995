//! Report API endpoints
//!
//! Every report is recomputed from the stored records on each request.

use api_types::stats::{
    CalendarDay, CalendarResponse, CategoryShare, ExpenseStats, HistoryQuery, HistoryResponse,
    HistoryRow, MonthDetail, MonthlySummary, PeakDay,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::{Month, today};

use crate::{ServerError, records::record_view, server::ServerState};

/// Months shown when the request does not say.
const DEFAULT_HISTORY_MONTHS: usize = 6;
const MAX_HISTORY_MONTHS: usize = 120;

fn map_summary(summary: engine::MonthlySummary) -> MonthlySummary {
    MonthlySummary {
        month: summary.month.to_string(),
        total_expenses: summary.total_expenses.amount(),
        total_incomes: summary.total_incomes.amount(),
        balance: summary.balance.amount(),
    }
}

fn map_share(share: engine::CategoryShare) -> CategoryShare {
    CategoryShare {
        category: share.category.as_str().to_string(),
        label: share.category.label().to_string(),
        total: share.total.amount(),
        count: share.count,
        share: share.share,
    }
}

pub async fn expense_stats(
    State(state): State<ServerState>,
    Path(month): Path<String>,
) -> Result<Json<ExpenseStats>, ServerError> {
    let month: Month = month.parse()?;
    let stats = state.engine.expense_stats(month).await?;

    Ok(Json(ExpenseStats {
        month: stats.month.to_string(),
        total: stats.total.amount(),
        previous_total: stats.previous_total.amount(),
        change: stats.change,
        daily_average: stats.daily_average,
        transaction_count: stats.transaction_count,
        peak_day: PeakDay {
            date: stats.peak_day.date,
            amount: stats.peak_day.amount.amount(),
        },
    }))
}

pub async fn history(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let anchor = match query.anchor {
        Some(anchor) => anchor.parse::<Month>()?,
        None => Month::of(today(state.options.timezone)),
    };
    let months = query.months.unwrap_or(DEFAULT_HISTORY_MONTHS);
    if months == 0 {
        return Err(ServerError::Generic("months must be positive".to_string()));
    }
    let months = months.min(MAX_HISTORY_MONTHS);

    let history = state.engine.monthly_history(anchor, months).await?;
    Ok(Json(HistoryResponse {
        rows: history
            .rows
            .into_iter()
            .map(|row| HistoryRow {
                summary: map_summary(row.summary),
                expense_change: row.expense_change,
            })
            .collect(),
        total_incomes: history.total_incomes.amount(),
        total_expenses: history.total_expenses.amount(),
        total_balance: history.total_balance.amount(),
    }))
}

pub async fn month_detail(
    State(state): State<ServerState>,
    Path(month): Path<String>,
) -> Result<Json<MonthDetail>, ServerError> {
    let month: Month = month.parse()?;
    let detail = state.engine.month_detail(month).await?;

    Ok(Json(MonthDetail {
        summary: map_summary(detail.summary),
        expense_count: detail.expenses.len(),
        income_count: detail.incomes.len(),
        expenses: detail.expenses.into_iter().map(record_view).collect(),
        incomes: detail.incomes.into_iter().map(record_view).collect(),
        expense_breakdown: detail.expense_breakdown.into_iter().map(map_share).collect(),
        income_breakdown: detail.income_breakdown.into_iter().map(map_share).collect(),
    }))
}

pub async fn calendar(
    State(state): State<ServerState>,
    Path(month): Path<String>,
) -> Result<Json<CalendarResponse>, ServerError> {
    let month: Month = month.parse()?;
    let days = state.engine.expense_calendar(month).await?;

    Ok(Json(CalendarResponse {
        month: month.to_string(),
        days: days
            .into_iter()
            .map(|(date, total)| CalendarDay {
                date,
                total: total.amount(),
            })
            .collect(),
    }))
}
