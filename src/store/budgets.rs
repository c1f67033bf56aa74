//! The client-side cache of budgets.

use crate::{
    Error,
    budget::{Budget, BudgetInput},
    category::Category,
    database_id::BudgetId,
    period::Period,
    store::{BudgetBackend, NoticeLog},
};

/// A cached list of budgets kept in step with a [BudgetBackend].
///
/// Mutations take `&mut self`, so there is only ever one writer.
#[derive(Debug)]
pub struct BudgetStore<B> {
    backend: B,
    budgets: Vec<Budget>,
    refresh_flag: bool,
    notices: NoticeLog,
}

impl<B: BudgetBackend> BudgetStore<B> {
    /// Create an empty store. Call [BudgetStore::refresh] to load the budgets.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            budgets: Vec::new(),
            refresh_flag: false,
            notices: NoticeLog::default(),
        }
    }

    /// The cached budgets.
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Flips on every call to [BudgetStore::refresh].
    pub fn refresh_flag(&self) -> bool {
        self.refresh_flag
    }

    /// The notices recorded by this store.
    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    /// Mutable access to the notices, e.g. to take them once shown.
    pub fn notices_mut(&mut self) -> &mut NoticeLog {
        &mut self.notices
    }

    /// Replace the cache with the backend's budgets for the current period.
    ///
    /// # Errors
    /// Returns the backend error. The cache keeps its previous contents.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.refresh_flag = !self.refresh_flag;

        match self.backend.list_budgets(None).await {
            Ok(budgets) => {
                self.budgets = budgets;
                Ok(())
            }
            Err(error) => {
                self.notices.error("Failed to load budgets");
                Err(error)
            }
        }
    }

    /// Set the current period's budget for `category`.
    ///
    /// # Errors
    /// Returns the backend error. The cache is not changed.
    pub async fn set_budget(&mut self, category: Category, amount: f64) -> Result<Budget, Error> {
        self.set_budget_with(BudgetInput::new(category, amount)).await
    }

    /// Set a budget for the category and period given in `input`.
    ///
    /// The returned budget replaces the cached budget with the same ID, or
    /// else the one with the same category and period, or is appended.
    ///
    /// # Errors
    /// Returns the backend error. The cache is not changed.
    pub async fn set_budget_with(&mut self, input: BudgetInput) -> Result<Budget, Error> {
        match self.backend.upsert_budget(input).await {
            Ok(budget) => {
                self.merge(budget.clone());
                self.notices.success("Budget set successfully");
                Ok(budget)
            }
            Err(error) => {
                self.notices.error("Failed to set budget");
                Err(error)
            }
        }
    }

    /// Delete a budget and drop it from the cache.
    ///
    /// # Errors
    /// Returns the backend error. The cache is not changed.
    pub async fn remove(&mut self, id: BudgetId) -> Result<(), Error> {
        match self.backend.delete_budget(id).await {
            Ok(()) => {
                self.budgets.retain(|budget| budget.id != id);
                self.notices.success("Budget deleted successfully");
                Ok(())
            }
            Err(error) => {
                self.notices.error("Failed to delete budget");
                Err(error)
            }
        }
    }

    /// The cached budget for `category` in `period`.
    pub fn budget_for(&self, category: Category, period: Period) -> Option<&Budget> {
        self.budgets
            .iter()
            .find(|budget| budget.category == category && budget.period() == period)
    }

    fn merge(&mut self, budget: Budget) {
        let position = self
            .budgets
            .iter()
            .position(|cached| cached.id == budget.id)
            .or_else(|| {
                self.budgets.iter().position(|cached| {
                    cached.category == budget.category && cached.period() == budget.period()
                })
            });

        match position {
            Some(index) => self.budgets[index] = budget,
            None => self.budgets.push(budget),
        }
    }
}
