//! The fixed table of transaction categories.
//!
//! [CATEGORIES] is the single source for category values, labels and the
//! transaction type each category belongs to. Validation, label lookups and
//! the category listing endpoint all read from it.

use std::{fmt::Display, str::FromStr};

use axum::Json;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The value used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::UnknownTransactionKind(other.to_owned())),
        }
    }
}

/// What a transaction was for, e.g. salary or food.
///
/// The variant order matches the order of [CATEGORIES].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Income from employment.
    Salary,
    /// Income from contract work.
    Freelance,
    /// Income from investments.
    Investments,
    /// Rent, mortgage and the like.
    Housing,
    /// Travel and commuting.
    Transportation,
    /// Groceries and eating out.
    Food,
    /// Power, water, internet.
    Utilities,
    /// Medical costs.
    Healthcare,
    /// Leisure spending.
    Entertainment,
    /// Courses, books, tuition.
    Education,
    /// General purchases.
    Shopping,
    /// Anything else.
    Other,
}

/// One row of the category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// The category.
    #[serde(skip)]
    pub category: Category,
    /// The type of transaction the category may be used with.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The value used on the wire and in the database.
    pub value: &'static str,
    /// The name shown to users.
    pub label: &'static str,
}

const fn row(
    category: Category,
    kind: TransactionKind,
    value: &'static str,
    label: &'static str,
) -> CategoryInfo {
    CategoryInfo {
        category,
        kind,
        value,
        label,
    }
}

/// Every category, income categories first, in display order.
pub const CATEGORIES: [CategoryInfo; 12] = [
    row(Category::Salary, TransactionKind::Income, "salary", "Salary"),
    row(Category::Freelance, TransactionKind::Income, "freelance", "Freelance"),
    row(Category::Investments, TransactionKind::Income, "investments", "Investments"),
    row(Category::Housing, TransactionKind::Expense, "housing", "Housing"),
    row(Category::Transportation, TransactionKind::Expense, "transportation", "Transportation"),
    row(Category::Food, TransactionKind::Expense, "food", "Food"),
    row(Category::Utilities, TransactionKind::Expense, "utilities", "Utilities"),
    row(Category::Healthcare, TransactionKind::Expense, "healthcare", "Healthcare"),
    row(Category::Entertainment, TransactionKind::Expense, "entertainment", "Entertainment"),
    row(Category::Education, TransactionKind::Expense, "education", "Education"),
    row(Category::Shopping, TransactionKind::Expense, "shopping", "Shopping"),
    row(Category::Other, TransactionKind::Expense, "other", "Other"),
];

impl Category {
    /// The table row for this category.
    pub fn info(self) -> &'static CategoryInfo {
        &CATEGORIES[self as usize]
    }

    /// The type of transaction this category may be used with.
    pub fn kind(self) -> TransactionKind {
        self.info().kind
    }

    /// The value used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        self.info().value
    }

    /// The name shown to users, e.g. "Transportation".
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// All categories of `kind` in table order.
    pub fn of_kind(kind: TransactionKind) -> impl Iterator<Item = Category> {
        CATEGORIES
            .iter()
            .filter(move |info| info.kind == kind)
            .map(|info| info.category)
    }

    /// Check that the category can be used with `kind`.
    ///
    /// # Errors
    /// Returns [Error::CategoryKindMismatch] if the category belongs to the other type.
    pub fn check_kind(self, kind: TransactionKind) -> Result<(), Error> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(Error::CategoryKindMismatch {
                category: self,
                kind,
            })
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORIES
            .iter()
            .find(|info| info.value == s)
            .map(|info| info.category)
            .ok_or_else(|| Error::UnknownCategory(s.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A route handler that lists the category table.
pub async fn get_categories_endpoint() -> Json<&'static [CategoryInfo]> {
    let categories: &'static [CategoryInfo] = &CATEGORIES;
    Json(categories)
}
