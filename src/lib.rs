//! Ledgerly is a personal finance tracker for recording income and expenses,
//! setting monthly budgets per category, and summarising both.
//!
//! The library provides:
//! - a JSON REST API over SQLite for transactions and budgets,
//! - client-side state stores that cache both collections and talk to the API,
//! - pure aggregation views (totals, monthly series, category breakdowns,
//!   budget vs actual, spending insight) recomputed from the caches.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod logging;
mod not_found;
mod period;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use budget::{Budget, BudgetInput, NewBudget, get_budgets_for_period, upsert_budget};
pub use category::{CATEGORIES, Category, CategoryInfo, TransactionKind};
pub use dashboard::{
    BudgetComparison, CategoryBreakdown, CategoryTotal, Dashboard, MonthlyTotals,
    RECENT_TRANSACTION_COUNT, SpendingInsight, Summary, UtilizationLevel, budget_vs_actual,
    category_breakdown, monthly_series, recent_transactions, spending_insight, summarize,
};
pub use database_id::{BudgetId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use period::Period;
pub use routing::build_router;
pub use store::{
    ApiClient, BudgetBackend, BudgetStore, LocalBackend, Notice, NoticeKind, NoticeLog,
    TransactionBackend, TransactionStore, dashboard_from_stores,
};
pub use timezone::{get_local_offset, get_timezone, offset_at};
pub use transaction::{
    DeletedMessage, NewTransaction, Transaction, TransactionInput, TransactionPatch,
    create_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was not provided.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// An amount was zero, negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// The date falls outside the years 1000 to 9999 in UTC.
    #[error("{0} is not a valid date, the year must be between 1000 and 9999")]
    InvalidDate(time::OffsetDateTime),

    /// The string does not name a category in [CATEGORIES].
    #[error("\"{0}\" is not a known category")]
    UnknownCategory(String),

    /// The string is neither "income" nor "expense".
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    UnknownTransactionKind(String),

    /// The category does not belong to the transaction's type.
    #[error("the category \"{category}\" cannot be used for {kind} transactions")]
    CategoryKindMismatch {
        /// The category that was given.
        category: Category,
        /// The type of the transaction.
        kind: TransactionKind,
    },

    /// Budgets can only be set for expense categories.
    #[error("budgets can only be set for expense categories, \"{0}\" is an income category")]
    NotExpenseCategory(Category),

    /// The month was not in 1-12 or the year did not have four digits.
    #[error("{month}/{year} is not a valid budget period")]
    InvalidPeriod {
        /// The month that was given.
        month: u8,
        /// The year that was given.
        year: i32,
    },

    /// The request body or query string could not be read into the expected type,
    /// e.g. a string where a number was expected.
    #[error("{0}")]
    InvalidRequest(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The HTTP request from a client could not be sent or its response could not be read.
    #[error("the request to the server failed: {0}")]
    Http(String),

    /// The server answered a client request with an error status.
    #[error("the server responded with {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The error message from the response body.
        message: String,
    },
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Http(value.to_string())
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A message describing what went wrong.
    pub error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::UnknownCategory(_)
            | Error::UnknownTransactionKind(_)
            | Error::CategoryKindMismatch { .. }
            | Error::NotExpenseCategory(_)
            | Error::InvalidPeriod { .. }
            | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::UpdateMissingTransaction => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::InvalidTimezone(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to a valid, canonical timezone string"
            ),
            error if status.is_server_error() => {
                // Any errors that are not handled above are not intended to be shown to the client.
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
