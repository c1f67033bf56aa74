//! Client-side state for transactions and budgets.
//!
//! Each store caches one collection, talks to the services through a
//! backend, and records a notice for the outcome of every action. The cache
//! is only changed after the backend call succeeds.

mod backend;
mod budgets;
mod client;
mod local;
mod notice;
mod transactions;

pub use backend::{BudgetBackend, TransactionBackend};
pub use budgets::BudgetStore;
pub use client::ApiClient;
pub use local::LocalBackend;
pub use notice::{Notice, NoticeKind, NoticeLog};
pub use transactions::TransactionStore;

use time_tz::Tz;

use crate::{dashboard::Dashboard, period::Period};

/// Compute the dashboard from the cached collections of both stores.
///
/// `tz` is the local timezone used to decide the current period and which
/// month each transaction falls in.
pub fn dashboard_from_stores<T, B>(
    transactions: &TransactionStore<T>,
    budgets: &BudgetStore<B>,
    tz: &Tz,
) -> Dashboard
where
    T: TransactionBackend,
    B: BudgetBackend,
{
    Dashboard::compute(
        transactions.transactions(),
        budgets.budgets(),
        Period::current(tz),
        tz,
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        category::{Category, TransactionKind},
        store::{BudgetStore, LocalBackend, TransactionStore, dashboard_from_stores},
        test_utils::get_shared_test_connection,
        timezone::get_timezone,
        transaction::TransactionInput,
    };

    #[tokio::test]
    async fn dashboard_reflects_store_changes() {
        let backend = LocalBackend::new(get_shared_test_connection(), "Etc/UTC").unwrap();
        let mut transactions = TransactionStore::new(backend.clone());
        let mut budgets = BudgetStore::new(backend);

        transactions
            .add(TransactionInput::new(75.0, TransactionKind::Expense, Category::Food))
            .await
            .unwrap();
        budgets.set_budget(Category::Food, 150.0).await.unwrap();

        let utc = get_timezone("Etc/UTC").unwrap();
        let dashboard = dashboard_from_stores(&transactions, &budgets, utc);

        assert_eq!(dashboard.summary.expense, 75.0);
        assert_eq!(dashboard.insight.utilization, 50.0);
        assert_eq!(dashboard.budget_vs_actual[0].difference, 75.0);

        let removed = transactions.transactions()[0].id;
        transactions.remove(removed).await.unwrap();

        let dashboard = dashboard_from_stores(&transactions, &budgets, utc);
        assert_eq!(dashboard.insight.utilization, 0.0);
        assert_eq!(dashboard.budget_vs_actual[0].actual, 0.0);
    }
}
