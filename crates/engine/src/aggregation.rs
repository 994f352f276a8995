//! Derived metrics over dated monetary records.
//!
//! Every function here is pure: it takes a snapshot of records and returns
//! plain values. Nothing is persisted; reports recompute on every request.
//!
//! Month bounds are inclusive on both ends and compare calendar days only.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Category, Money, MonetaryRecord, Month, RecordKind};

/// Totals for one calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: Month,
    pub total_expenses: Money,
    pub total_incomes: Money,
    /// `total_incomes - total_expenses`; negative when overspent.
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Money,
    pub count: usize,
    /// Fraction of the grand total in `0.0..=1.0`; `0.0` when the grand
    /// total is zero.
    pub share: f64,
}

/// Day with the highest summed amount. `date` is `None` when there is no
/// such day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakDay {
    pub date: Option<NaiveDate>,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub summary: MonthlySummary,
    /// Expense change against the previous row, in percent. The oldest row
    /// has nothing to compare to and reports `0.0`.
    pub expense_change: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub rows: Vec<HistoryRow>,
    pub total_incomes: Money,
    pub total_expenses: Money,
    pub total_balance: Money,
}

/// Dashboard figures for the expenses of one month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStats {
    pub month: Month,
    pub total: Money,
    pub previous_total: Money,
    pub change: f64,
    pub daily_average: f64,
    pub transaction_count: usize,
    pub peak_day: PeakDay,
}

/// Everything the month detail page shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthDetail {
    pub summary: MonthlySummary,
    pub expenses: Vec<MonetaryRecord>,
    pub incomes: Vec<MonetaryRecord>,
    pub expense_breakdown: Vec<CategoryShare>,
    pub income_breakdown: Vec<CategoryShare>,
}

fn in_month<'a>(
    records: &'a [MonetaryRecord],
    month: Month,
    kind: RecordKind,
) -> impl Iterator<Item = &'a MonetaryRecord> {
    records
        .iter()
        .filter(move |r| r.kind == kind && month.contains(r.date))
}

/// Sum of `amount` over records of `kind` dated inside `month`.
pub fn monthly_total(records: &[MonetaryRecord], month: Month, kind: RecordKind) -> Money {
    in_month(records, month, kind).map(|r| r.amount).sum()
}

/// Percentage change from `previous` to `current`.
///
/// When `previous` is not positive there is no meaningful base, and the
/// result is `0.0` rather than an infinity or NaN.
pub fn percentage_change(current: Money, previous: Money) -> f64 {
    if !previous.is_positive() {
        return 0.0;
    }
    (current - previous).as_f64() / previous.as_f64() * 100.0
}

/// Groups records by category, largest total first.
///
/// Ties keep the order in which their category first appeared.
pub fn category_breakdown(records: &[MonetaryRecord]) -> Vec<CategoryShare> {
    let mut index: HashMap<Category, usize> = HashMap::new();
    let mut groups: Vec<CategoryShare> = Vec::new();

    for record in records {
        let slot = *index.entry(record.category).or_insert_with(|| {
            groups.push(CategoryShare {
                category: record.category,
                total: Money::ZERO,
                count: 0,
                share: 0.0,
            });
            groups.len() - 1
        });
        groups[slot].total += record.amount;
        groups[slot].count += 1;
    }

    let grand_total: Money = groups.iter().map(|g| g.total).sum();
    if grand_total.is_positive() {
        for group in &mut groups {
            group.share = group.total.as_f64() / grand_total.as_f64();
        }
    }

    // `sort_by` is stable.
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// Average per calendar day; `0.0` for a zero-day period.
pub fn daily_average(total: Money, days_in_month: u32) -> f64 {
    if days_in_month == 0 {
        return 0.0;
    }
    total.as_f64() / f64::from(days_in_month)
}

/// Date with the highest summed amount.
///
/// On ties the date met first in `records` wins, so the answer depends on
/// input order and is meant for display only.
pub fn peak_day(records: &[MonetaryRecord]) -> PeakDay {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut totals: HashMap<NaiveDate, Money> = HashMap::new();
    for record in records {
        let total = totals.entry(record.date).or_insert_with(|| {
            order.push(record.date);
            Money::ZERO
        });
        *total += record.amount;
    }

    order
        .into_iter()
        .fold(PeakDay::default(), |best, date| {
            let amount = totals.get(&date).copied().unwrap_or_default();
            if amount > best.amount {
                PeakDay {
                    date: Some(date),
                    amount,
                }
            } else {
                best
            }
        })
}

/// Per-day totals of `kind` inside `month`, for the calendar view.
pub fn daily_totals(
    records: &[MonetaryRecord],
    month: Month,
    kind: RecordKind,
) -> BTreeMap<NaiveDate, Money> {
    let mut days = BTreeMap::new();
    for record in in_month(records, month, kind) {
        *days.entry(record.date).or_insert(Money::ZERO) += record.amount;
    }
    days
}

pub fn monthly_summary(records: &[MonetaryRecord], month: Month) -> MonthlySummary {
    let total_expenses = monthly_total(records, month, RecordKind::Expense);
    let total_incomes = monthly_total(records, month, RecordKind::Income);
    MonthlySummary {
        month,
        total_expenses,
        total_incomes,
        balance: total_incomes - total_expenses,
    }
}

/// Summaries for `window` consecutive months ending at `anchor`, oldest
/// first. `records` may mix expenses and incomes.
pub fn monthly_history(
    records: &[MonetaryRecord],
    anchor: Month,
    window: usize,
) -> Vec<MonthlySummary> {
    anchor
        .window_ending_here(window)
        .into_iter()
        .map(|month| monthly_summary(records, month))
        .collect()
}

/// [`monthly_history`] with month-over-month expense change and window
/// totals.
pub fn history_with_trend(records: &[MonetaryRecord], anchor: Month, window: usize) -> History {
    let summaries = monthly_history(records, anchor, window);

    let mut rows = Vec::with_capacity(summaries.len());
    let mut previous: Option<Money> = None;
    for summary in summaries {
        let expense_change = previous
            .map(|prev| percentage_change(summary.total_expenses, prev))
            .unwrap_or(0.0);
        previous = Some(summary.total_expenses);
        rows.push(HistoryRow {
            summary,
            expense_change,
        });
    }

    History {
        total_incomes: rows.iter().map(|r| r.summary.total_incomes).sum(),
        total_expenses: rows.iter().map(|r| r.summary.total_expenses).sum(),
        total_balance: rows.iter().map(|r| r.summary.balance).sum(),
        rows,
    }
}

/// Expense dashboard for `month`, compared with the month before.
pub fn expense_stats(records: &[MonetaryRecord], month: Month) -> ExpenseStats {
    let current: Vec<MonetaryRecord> = in_month(records, month, RecordKind::Expense)
        .cloned()
        .collect();
    let total: Money = current.iter().map(|r| r.amount).sum();
    let previous_total = month
        .previous()
        .map(|prev| monthly_total(records, prev, RecordKind::Expense))
        .unwrap_or_default();

    ExpenseStats {
        month,
        total,
        previous_total,
        change: percentage_change(total, previous_total),
        daily_average: daily_average(total, month.days()),
        transaction_count: current.len(),
        peak_day: peak_day(&current),
    }
}

/// Splits `records` of `month` by kind, keeping their order.
pub fn month_detail(records: &[MonetaryRecord], month: Month) -> MonthDetail {
    let expenses: Vec<MonetaryRecord> = in_month(records, month, RecordKind::Expense)
        .cloned()
        .collect();
    let incomes: Vec<MonetaryRecord> = in_month(records, month, RecordKind::Income)
        .cloned()
        .collect();

    MonthDetail {
        summary: monthly_summary(records, month),
        expense_breakdown: category_breakdown(&expenses),
        income_breakdown: category_breakdown(&incomes),
        expenses,
        incomes,
    }
}
