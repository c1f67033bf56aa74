use serde::Serialize;
use time_tz::Tz;

use crate::{
    budget::Budget,
    dashboard::aggregation::{
        BudgetComparison, CategoryBreakdown, MonthlyTotals, SpendingInsight, Summary,
        budget_vs_actual, category_breakdown, monthly_series, recent_transactions,
        spending_insight, summarize,
    },
    period::Period,
    transaction::Transaction,
};

/// How many transactions the dashboard lists as recent.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// Every dashboard summary for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// The period that budget-scoped summaries cover.
    pub period: Period,
    /// Totals over all transactions.
    pub summary: Summary,
    /// Income and expenses per month, oldest first.
    pub monthly: Vec<MonthlyTotals>,
    /// Totals per category over all transactions.
    pub categories: CategoryBreakdown,
    /// Budgeted versus actual spending in `period`.
    pub budget_vs_actual: Vec<BudgetComparison>,
    /// Spending against the total budget in `period`.
    pub insight: SpendingInsight,
    /// The most recent transactions, newest first.
    pub recent: Vec<Transaction>,
}

impl Dashboard {
    /// Compute every summary from scratch.
    ///
    /// `tz` decides which month each transaction falls in.
    pub fn compute(
        transactions: &[Transaction],
        budgets: &[Budget],
        period: Period,
        tz: &Tz,
    ) -> Self {
        Self {
            period,
            summary: summarize(transactions),
            monthly: monthly_series(transactions, tz),
            categories: category_breakdown(transactions),
            budget_vs_actual: budget_vs_actual(transactions, budgets, period, tz),
            insight: spending_insight(transactions, budgets, period, tz),
            recent: recent_transactions(transactions, RECENT_TRANSACTION_COUNT),
        }
    }
}
