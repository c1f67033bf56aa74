//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    category::{Category, TransactionKind},
    database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// When the transaction happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// What the transaction was for.
    pub category: Category,
}

/// The request body for creating a transaction.
///
/// Every field is optional so that a missing field is reported as a
/// validation error naming the field. Use [TransactionInput::new] to build a
/// complete input in code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// The amount of money, must be greater than zero.
    pub amount: Option<f64>,
    /// When the transaction happened. Defaults to the time of creation.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// Free text describing the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// "income" or "expense".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// A category value matching `kind`, e.g. "food".
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionInput {
    /// Create an input with the required fields set.
    pub fn new(amount: f64, kind: TransactionKind, category: Category) -> Self {
        Self {
            amount: Some(amount),
            date: None,
            description: None,
            kind: Some(kind.as_str().to_owned()),
            category: Some(category.as_str().to_owned()),
        }
    }

    /// Set the date of the transaction.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Check the input and fill in defaults, using `now` when no date was given.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingField] if amount, type or category is missing,
    /// - [Error::InvalidAmount] if the amount is not greater than zero,
    /// - [Error::InvalidDate] if the date is not in a four-digit year in UTC,
    /// - [Error::UnknownTransactionKind] or [Error::UnknownCategory] for unrecognised values,
    /// - [Error::CategoryKindMismatch] if the category does not belong to the type.
    pub fn validate(self, now: OffsetDateTime) -> Result<NewTransaction, Error> {
        let amount = self.amount.ok_or(Error::MissingField("amount"))?;
        let kind = self.kind.ok_or(Error::MissingField("type"))?;
        let category = self.category.ok_or(Error::MissingField("category"))?;

        let amount = validate_amount(amount)?;
        let kind: TransactionKind = kind.parse()?;
        let category: Category = category.parse()?;
        category.check_kind(kind)?;
        let date = validate_date(self.date.unwrap_or(now))?;

        Ok(NewTransaction {
            amount,
            date,
            description: normalize_description(self.description),
            kind,
            category,
        })
    }
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money, greater than zero.
    pub amount: f64,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// Free text describing the transaction.
    pub description: Option<String>,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// What the transaction was for, matching `kind`.
    pub category: Category,
}

/// The request body for updating a transaction.
///
/// Fields that are `None` keep their stored value. The ID and date cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// The new amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new description.
    #[serde(default)]
    pub description: Option<String>,
    /// The new type, "income" or "expense".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// The new category value.
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionPatch {
    /// Set the new amount.
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the new description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the new type and category together.
    pub fn category(mut self, kind: TransactionKind, category: Category) -> Self {
        self.kind = Some(kind.as_str().to_owned());
        self.category = Some(category.as_str().to_owned());
        self
    }

    /// Merge the patch into `transaction`, validating the result.
    ///
    /// # Errors
    /// Returns the same validation errors as [TransactionInput::validate]. The
    /// category/type check runs on the merged record, so changing only one of
    /// them to a value that does not fit the other is rejected.
    pub fn apply(self, mut transaction: Transaction) -> Result<Transaction, Error> {
        if let Some(amount) = self.amount {
            transaction.amount = validate_amount(amount)?;
        }

        if let Some(kind) = self.kind {
            transaction.kind = kind.parse()?;
        }

        if let Some(category) = self.category {
            transaction.category = category.parse()?;
        }

        if self.description.is_some() {
            transaction.description = normalize_description(self.description);
        }

        transaction.category.check_kind(transaction.kind)?;

        Ok(transaction)
    }
}

fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

fn validate_date(date: OffsetDateTime) -> Result<OffsetDateTime, Error> {
    match date.checked_to_offset(UtcOffset::UTC) {
        Some(utc) if (1000..=9999).contains(&utc.year()) => Ok(date),
        _ => Err(Error::InvalidDate(date)),
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Convert to UTC and drop sub-second precision so that stored dates sort correctly as text.
fn normalize_date(date: OffsetDateTime) -> OffsetDateTime {
    let date = date.to_offset(UtcOffset::UTC);
    date - Duration::nanoseconds(i64::from(date.nanosecond()))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, date, description, type, category)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, date, description, type, category",
        )?
        .query_row(
            (
                transaction.amount,
                normalize_date(transaction.date),
                transaction.description,
                transaction.kind,
                transaction.category,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, date, description, type, category FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction, most recent first.
///
/// Transactions on the same instant are ordered by descending ID, so the most
/// recently created one comes first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, amount, date, description, type, category FROM \"transaction\"
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Merge `patch` into the transaction with `id` and store the result.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - a validation error if the merged transaction is invalid (see [TransactionPatch::apply]),
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    patch: TransactionPatch,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = match get_transaction(id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    let updated = patch.apply(existing)?;

    let transaction = connection
        .prepare(
            "UPDATE \"transaction\" SET amount = ?1, description = ?2, type = ?3, category = ?4
             WHERE id = ?5
             RETURNING id, amount, date, description, type, category",
        )?
        .query_row(
            (
                updated.amount,
                updated.description,
                updated.kind,
                updated.category,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Delete the transaction with `id`.
///
/// Deleting a transaction that does not exist is not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        tracing::debug!("transaction {id} was already deleted");
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                description TEXT,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let description = row.get(3)?;
    let kind = row.get(4)?;
    let category = row.get(5)?;

    Ok(Transaction {
        id,
        amount,
        date,
        description,
        kind,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================
