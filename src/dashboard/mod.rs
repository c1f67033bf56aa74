//! Dashboard module
//!
//! Derives the summaries shown on the dashboard from the lists of
//! transactions and budgets, and serves them as JSON.

mod aggregation;
mod handlers;
mod view;

pub use aggregation::{
    BudgetComparison, CategoryBreakdown, CategoryTotal, MonthlyTotals, SpendingInsight, Summary,
    UtilizationLevel, budget_vs_actual, category_breakdown, monthly_series, recent_transactions,
    spending_insight, summarize,
};
pub use handlers::get_dashboard_endpoint;
pub use view::{Dashboard, RECENT_TRANSACTION_COUNT};
