use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    ExpenseStats, History, Money, MonetaryRecord, Month, MonthDetail, RecordKind, RecordStore,
    ResultEngine, SalaryEstimate, aggregation, estimate_salary,
};

use super::Engine;

impl Engine {
    /// Records of both kinds dated from the start of `first` to the end of
    /// `last`.
    async fn records_between(&self, first: Month, last: Month) -> ResultEngine<Vec<MonetaryRecord>> {
        let (start, end) = (first.first_day(), last.last_day());
        let mut records = self
            .query_by_date_range(RecordKind::Expense, start, end)
            .await?;
        records.extend(
            self.query_by_date_range(RecordKind::Income, start, end)
                .await?,
        );
        Ok(records)
    }

    /// Expense dashboard for `month`.
    pub async fn expense_stats(&self, month: Month) -> ResultEngine<ExpenseStats> {
        let first = month.previous().unwrap_or(month);
        let expenses = self
            .query_by_date_range(RecordKind::Expense, first.first_day(), month.last_day())
            .await?;
        Ok(aggregation::expense_stats(&expenses, month))
    }

    /// `window` months ending at `anchor`, oldest first, with trend and
    /// totals. A zero window yields an empty history.
    pub async fn monthly_history(&self, anchor: Month, window: usize) -> ResultEngine<History> {
        let records = match anchor.window_ending_here(window).first() {
            Some(first) => self.records_between(*first, anchor).await?,
            None => Vec::new(),
        };
        Ok(aggregation::history_with_trend(&records, anchor, window))
    }

    /// Both record lists of `month`, newest first, with their breakdowns.
    pub async fn month_detail(&self, month: Month) -> ResultEngine<MonthDetail> {
        let records = self.records_between(month, month).await?;
        Ok(aggregation::month_detail(&records, month))
    }

    /// Expense total per day of `month`; days without expenses are absent.
    pub async fn expense_calendar(&self, month: Month) -> ResultEngine<BTreeMap<NaiveDate, Money>> {
        let expenses = self
            .query_by_date_range(RecordKind::Expense, month.first_day(), month.last_day())
            .await?;
        Ok(aggregation::daily_totals(
            &expenses,
            month,
            RecordKind::Expense,
        ))
    }

    pub async fn expenses_on(&self, date: NaiveDate) -> ResultEngine<Vec<MonetaryRecord>> {
        self.query_by_date(RecordKind::Expense, date).await
    }

    pub async fn salary_estimate(
        &self,
        month: Month,
        monthly_salary: Money,
    ) -> ResultEngine<SalaryEstimate> {
        let markings = self
            .attendance_between(month.first_day(), month.last_day())
            .await?;
        Ok(estimate_salary(&markings, month, monthly_salary))
    }
}
