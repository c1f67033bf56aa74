//! Monthly budgets per expense category.
//!
//! - The `Budget` model and the input type for setting a budget
//! - Database functions for upserting, listing and deleting budgets
//! - Route handlers for the budget JSON API

mod core;
mod delete_endpoint;
mod list_endpoint;
mod upsert_endpoint;

pub use self::core::{
    Budget, BudgetInput, NewBudget, create_budget_table, delete_budget, get_budgets_for_period,
    upsert_budget,
};
pub use delete_endpoint::delete_budget_endpoint;
pub use list_endpoint::{BudgetPeriodQuery, list_budgets_endpoint};
pub use upsert_endpoint::upsert_budget_endpoint;

#[cfg(test)]
pub use self::core::count_budgets;
