//! Defines the budget model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{Category, TransactionKind},
    database_id::BudgetId,
    period::Period,
};

/// A monthly spending cap for one expense category.
///
/// There is at most one budget for each combination of category, month and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The expense category the cap applies to.
    pub category: Category,
    /// The most that should be spent in the category during the month.
    pub amount: f64,
    /// The month number, 1-12.
    pub month: u8,
    /// The four-digit year.
    pub year: i32,
}

impl Budget {
    /// The calendar month this budget applies to.
    pub fn period(&self) -> Period {
        Period::new_unchecked(self.month, self.year)
    }
}

/// The request body for setting a budget.
///
/// `month` and `year` each default to the current period when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    /// An expense category value, e.g. "food".
    #[serde(default)]
    pub category: Option<String>,
    /// The monthly cap, must be greater than zero.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The month number, 1-12.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    /// The four-digit year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl BudgetInput {
    /// Create an input for the current period.
    pub fn new(category: Category, amount: f64) -> Self {
        Self {
            category: Some(category.as_str().to_owned()),
            amount: Some(amount),
            month: None,
            year: None,
        }
    }

    /// Set the budget for `period` instead of the current period.
    pub fn period(mut self, period: Period) -> Self {
        self.month = Some(period.month());
        self.year = Some(period.year());
        self
    }

    /// Check the input, filling in missing month or year from `current`.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingField] if category or amount is missing,
    /// - [Error::UnknownCategory] or [Error::NotExpenseCategory] for a category that cannot be budgeted,
    /// - [Error::InvalidAmount] if the amount is not greater than zero,
    /// - [Error::InvalidPeriod] if the month or year is out of range.
    pub fn validate(self, current: Period) -> Result<NewBudget, Error> {
        let category = self.category.ok_or(Error::MissingField("category"))?;
        let amount = self.amount.ok_or(Error::MissingField("amount"))?;

        let category: Category = category.parse()?;
        if category.kind() != TransactionKind::Expense {
            return Err(Error::NotExpenseCategory(category));
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        let period = Period::new(
            self.month.unwrap_or(current.month()),
            self.year.unwrap_or(current.year()),
        )?;

        Ok(NewBudget {
            category,
            amount,
            period,
        })
    }
}

/// A validated budget ready to be upserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// An expense category.
    pub category: Category,
    /// The monthly cap, greater than zero.
    pub amount: f64,
    /// The month the cap applies to.
    pub period: Period,
}

/// Create the budget for the category and period, or overwrite its amount if it already exists.
///
/// An existing budget keeps its ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn upsert_budget(budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "INSERT INTO budget (category, amount, month, year) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (category, month, year) DO UPDATE SET amount = excluded.amount
             RETURNING id, category, amount, month, year",
        )?
        .query_row(
            (
                budget.category,
                budget.amount,
                budget.period.month(),
                budget.period.year(),
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve the budgets for `period` in category table order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_budgets_for_period(period: Period, connection: &Connection) -> Result<Vec<Budget>, Error> {
    let mut budgets = connection
        .prepare(
            "SELECT id, category, amount, month, year FROM budget
             WHERE month = :month AND year = :year",
        )?
        .query_map(
            &[(":month", &i64::from(period.month())), (":year", &i64::from(period.year()))],
            map_budget_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    budgets.sort_by_key(|budget| budget.category);

    Ok(budgets)
}

/// Delete the budget with `id`.
///
/// Deleting a budget that does not exist is not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        tracing::debug!("budget {id} was already deleted");
    }

    Ok(())
}

/// Get the total number of budgets across all periods.
#[cfg(test)]
pub fn count_budgets(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM budget;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the budget table in the database.
///
/// The unique constraint covers the category together with the period, so a
/// category can have a different budget every month.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            year INTEGER NOT NULL CHECK (year BETWEEN 1000 AND 9999),
            UNIQUE (category, month, year)
        );

        CREATE INDEX IF NOT EXISTS idx_budget_period ON budget(year, month);",
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        month: row.get(3)?,
        year: row.get(4)?,
    })
}
