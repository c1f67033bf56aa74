//! Defines the endpoint for listing every transaction.

use axum::{
    Json,
    extract::{FromRef, State},
};

use crate::{
    AppState, Error,
    db::{SharedConnection, lock_connection},
    transaction::{Transaction, core::get_all_transactions},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: SharedConnection,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with all transactions, most recent first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not list transactions: {error}"))
        .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use time::macros::datetime;

    use crate::{
        category::{Category, TransactionKind},
        test_utils::{assert_status, get_shared_test_connection, parse_json_body},
        transaction::{Transaction, TransactionInput, core::create_transaction},
    };

    use super::{ListTransactionsState, list_transactions_endpoint};

    #[tokio::test]
    async fn responds_with_newest_first() {
        let state = ListTransactionsState {
            db_connection: get_shared_test_connection(),
        };
        let now = datetime!(2025-06-01 00:00 UTC);
        {
            let connection = state.db_connection.lock().unwrap();
            for (amount, date) in [
                (1.0, datetime!(2025-05-01 10:00 UTC)),
                (2.0, datetime!(2025-05-20 10:00 UTC)),
            ] {
                let input = TransactionInput::new(amount, TransactionKind::Expense, Category::Food)
                    .date(date);
                create_transaction(input.validate(now).unwrap(), &connection).unwrap();
            }
        }

        let response = list_transactions_endpoint(State(state))
            .await
            .into_response();

        assert_status(&response, StatusCode::OK);
        let transactions: Vec<Transaction> = parse_json_body(response).await;
        let amounts: Vec<_> = transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![2.0, 1.0]);
    }
}
