//! The persistence seam between the stores and the services.

use std::future::Future;

use crate::{
    Error,
    budget::{Budget, BudgetInput},
    database_id::{BudgetId, TransactionId},
    period::Period,
    transaction::{Transaction, TransactionInput, TransactionPatch},
};

/// Where a [TransactionStore](crate::TransactionStore) sends its reads and writes.
pub trait TransactionBackend {
    /// Every transaction, newest first.
    fn list_transactions(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Validate and store a new transaction.
    fn create_transaction(
        &self,
        input: TransactionInput,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Merge `patch` into the transaction with `id`.
    fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Delete the transaction with `id`. Succeeds if it does not exist.
    fn delete_transaction(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Where a [BudgetStore](crate::BudgetStore) sends its reads and writes.
pub trait BudgetBackend {
    /// The budgets for `period`, or for the current period if `None`.
    fn list_budgets(
        &self,
        period: Option<Period>,
    ) -> impl Future<Output = Result<Vec<Budget>, Error>> + Send;

    /// Create or overwrite the budget for a category and period.
    fn upsert_budget(
        &self,
        input: BudgetInput,
    ) -> impl Future<Output = Result<Budget, Error>> + Send;

    /// Delete the budget with `id`. Succeeds if it does not exist.
    fn delete_budget(&self, id: BudgetId) -> impl Future<Output = Result<(), Error>> + Send;
}
