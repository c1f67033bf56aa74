//! A backend that calls the transaction and budget services in-process.

use axum::extract::FromRef;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    AppState, Error,
    budget::{self, Budget, BudgetInput},
    database_id::{BudgetId, TransactionId},
    db::{SharedConnection, lock_connection},
    period::Period,
    store::{BudgetBackend, TransactionBackend},
    timezone::timezone_or_error,
    transaction::{self, Transaction, TransactionInput, TransactionPatch},
};

/// Reads and writes transactions and budgets directly through a database connection.
///
/// Useful for running the stores without an HTTP server, e.g. in tests or a
/// single-process client.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    db_connection: SharedConnection,
    local_timezone: String,
}

impl LocalBackend {
    /// Create a backend over an initialized database.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `local_timezone` is not a canonical timezone name.
    pub fn new(db_connection: SharedConnection, local_timezone: &str) -> Result<Self, Error> {
        timezone_or_error(local_timezone)?;

        Ok(Self {
            db_connection,
            local_timezone: local_timezone.to_owned(),
        })
    }

    fn timezone(&self) -> Result<&'static Tz, Error> {
        timezone_or_error(&self.local_timezone)
    }
}

impl FromRef<AppState> for LocalBackend {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl TransactionBackend for LocalBackend {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.db_connection)?;
        transaction::get_all_transactions(&connection)
    }

    async fn create_transaction(&self, input: TransactionInput) -> Result<Transaction, Error> {
        let new_transaction = input.validate(OffsetDateTime::now_utc())?;
        let connection = lock_connection(&self.db_connection)?;
        transaction::create_transaction(new_transaction, &connection)
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.db_connection)?;
        transaction::update_transaction(id, patch, &connection)
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        let connection = lock_connection(&self.db_connection)?;
        transaction::delete_transaction(id, &connection)
    }
}

impl BudgetBackend for LocalBackend {
    async fn list_budgets(&self, period: Option<Period>) -> Result<Vec<Budget>, Error> {
        let period = match period {
            Some(period) => period,
            None => Period::current(self.timezone()?),
        };

        let connection = lock_connection(&self.db_connection)?;
        budget::get_budgets_for_period(period, &connection)
    }

    async fn upsert_budget(&self, input: BudgetInput) -> Result<Budget, Error> {
        let new_budget = input.validate(Period::current(self.timezone()?))?;
        let connection = lock_connection(&self.db_connection)?;
        budget::upsert_budget(new_budget, &connection)
    }

    async fn delete_budget(&self, id: BudgetId) -> Result<(), Error> {
        let connection = lock_connection(&self.db_connection)?;
        budget::delete_budget(id, &connection)
    }
}
