//! Defines the endpoint for updating a transaction.

use axum::{
    Json,
    extract::{FromRef, Path, State},
};

use crate::{
    AppState, Error,
    database_id::TransactionId,
    db::{SharedConnection, lock_connection},
    extract::ApiJson,
    transaction::{Transaction, TransactionPatch, core::update_transaction},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: SharedConnection,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for merging changes into an existing transaction.
///
/// Responds with the updated transaction, 404 Not Found if there is no
/// transaction with the ID, or 400 Bad Request if the merged transaction is invalid.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    ApiJson(patch): ApiJson<TransactionPatch>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_transaction(transaction_id, patch, &connection)
        .inspect_err(|error| {
            tracing::debug!("could not update transaction {transaction_id}: {error}")
        })
        .map(Json)
}
