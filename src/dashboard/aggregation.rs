//! Summaries derived from the full lists of transactions and budgets.
//!
//! Every function here is pure and recomputes its result from scratch, so the
//! same functions back both the server's dashboard endpoint and the client
//! stores' cached views.

use std::collections::BTreeMap;

use serde::Serialize;
use time_tz::Tz;

use crate::{
    budget::Budget,
    category::{Category, TransactionKind},
    period::Period,
    transaction::Transaction,
};

/// Income and expense totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expense: f64,
    /// Income minus expenses.
    pub net: f64,
}

/// The income and expense totals for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The month the totals cover.
    pub period: Period,
    /// A short label for charts, e.g. "Jan 2025".
    pub label: String,
    /// The sum of income in the month.
    pub income: f64,
    /// The sum of expenses in the month.
    pub expense: f64,
}

/// The total amount for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category.
    pub category: Category,
    /// The display name of the category.
    pub label: &'static str,
    /// The sum of transaction amounts in the category.
    pub total: f64,
}

/// Category totals split by transaction type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Totals for income categories, in the order each was first seen.
    pub income: Vec<CategoryTotal>,
    /// Totals for expense categories, in the order each was first seen.
    pub expense: Vec<CategoryTotal>,
}

/// Budgeted versus actual spending for one category in one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetComparison {
    /// The expense category.
    pub category: Category,
    /// The display name of the category.
    pub label: &'static str,
    /// The budgeted amount.
    pub budget: f64,
    /// The amount actually spent.
    pub actual: f64,
    /// `budget - actual`, negative when overspent.
    pub difference: f64,
}

/// How close spending is to the total budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationLevel {
    /// At most 75% of the budget has been spent.
    Healthy,
    /// More than 75% and at most 90% of the budget has been spent.
    Warning,
    /// More than 90% of the budget has been spent.
    Critical,
}

impl UtilizationLevel {
    /// Classify a utilization percentage.
    pub fn from_utilization(utilization: f64) -> Self {
        if utilization > 90.0 {
            Self::Critical
        } else if utilization > 75.0 {
            Self::Warning
        } else {
            Self::Healthy
        }
    }
}

/// Spending against budget for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingInsight {
    /// The month the insight covers.
    pub period: Period,
    /// The sum of expenses in the month.
    pub expense_total: f64,
    /// The sum of every category budget for the month.
    pub budget_total: f64,
    /// `expense_total / budget_total` as a percentage, or zero if there is no budget.
    pub utilization: f64,
    /// The band `utilization` falls in.
    pub level: UtilizationLevel,
    /// The expense category with the most spending in the month, if anything was spent.
    pub most_spent: Option<CategoryTotal>,
}

/// Sum income and expenses.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = 0.0;
    let mut expense = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income += transaction.amount,
            TransactionKind::Expense => expense += transaction.amount,
        }
    }

    Summary {
        income,
        expense,
        net: income - expense,
    }
}

/// Group transactions by the month they fall in when viewed in `tz`.
///
/// # Returns
/// One entry per month that has at least one transaction, in ascending order.
pub fn monthly_series(transactions: &[Transaction], tz: &Tz) -> Vec<MonthlyTotals> {
    let mut totals: BTreeMap<Period, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let entry = totals
            .entry(Period::containing(transaction.date, tz))
            .or_default();

        match transaction.kind {
            TransactionKind::Income => entry.0 += transaction.amount,
            TransactionKind::Expense => entry.1 += transaction.amount,
        }
    }

    totals
        .into_iter()
        .map(|(period, (income, expense))| MonthlyTotals {
            period,
            label: period.label(),
            income,
            expense,
        })
        .collect()
}

/// Sum amounts per category, separately for income and expenses.
pub fn category_breakdown(transactions: &[Transaction]) -> CategoryBreakdown {
    let totals_for = |kind| {
        group_by_category(
            transactions
                .iter()
                .filter(|transaction| transaction.kind == kind),
        )
    };

    CategoryBreakdown {
        income: totals_for(TransactionKind::Income),
        expense: totals_for(TransactionKind::Expense),
    }
}

/// Compare each budget in `period` with the expenses in its category.
///
/// Expense categories are listed in category table order. Categories without a
/// budget greater than zero in `period` are left out, even if money was spent in them.
pub fn budget_vs_actual(
    transactions: &[Transaction],
    budgets: &[Budget],
    period: Period,
    tz: &Tz,
) -> Vec<BudgetComparison> {
    let spending = group_by_category(period_expenses(transactions, period, tz));

    Category::of_kind(TransactionKind::Expense)
        .filter_map(|category| {
            let budget = budgets
                .iter()
                .find(|budget| budget.category == category && budget.period() == period)
                .map_or(0.0, |budget| budget.amount);

            if budget <= 0.0 {
                return None;
            }

            let actual = spending
                .iter()
                .find(|total| total.category == category)
                .map_or(0.0, |total| total.total);

            Some(BudgetComparison {
                category,
                label: category.label(),
                budget,
                actual,
                difference: budget - actual,
            })
        })
        .collect()
}

/// Summarise spending against the total budget for `period`.
///
/// The most spent category is the one with the largest expense total. When two
/// categories have the same total, the one whose first transaction comes
/// earlier in `transactions` wins.
pub fn spending_insight(
    transactions: &[Transaction],
    budgets: &[Budget],
    period: Period,
    tz: &Tz,
) -> SpendingInsight {
    let spending = group_by_category(period_expenses(transactions, period, tz));
    let expense_total: f64 = spending.iter().map(|total| total.total).sum();
    let budget_total: f64 = budgets
        .iter()
        .filter(|budget| budget.period() == period)
        .map(|budget| budget.amount)
        .sum();

    let utilization = if budget_total > 0.0 {
        expense_total / budget_total * 100.0
    } else {
        0.0
    };

    let mut most_spent: Option<CategoryTotal> = None;
    for total in spending {
        // Strictly greater so that ties keep the earlier category.
        if most_spent.is_none_or(|best| total.total > best.total) {
            most_spent = Some(total);
        }
    }

    SpendingInsight {
        period,
        expense_total,
        budget_total,
        utilization,
        level: UtilizationLevel::from_utilization(utilization),
        most_spent,
    }
}

/// The `count` most recent transactions, newest first.
pub fn recent_transactions(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    sorted.truncate(count);
    sorted
}

fn period_expenses<'a>(
    transactions: &'a [Transaction],
    period: Period,
    tz: &'a Tz,
) -> impl Iterator<Item = &'a Transaction> {
    transactions.iter().filter(move |transaction| {
        transaction.kind == TransactionKind::Expense
            && Period::containing(transaction.date, tz) == period
    })
}

/// Sum amounts per category, keeping categories in the order they are first seen.
fn group_by_category<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        match totals
            .iter_mut()
            .find(|total| total.category == transaction.category)
        {
            Some(total) => total.total += transaction.amount,
            None => totals.push(CategoryTotal {
                category: transaction.category,
                label: transaction.category.label(),
                total: transaction.amount,
            }),
        }
    }

    totals
}
