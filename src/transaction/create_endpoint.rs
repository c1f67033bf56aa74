//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    db::{SharedConnection, lock_connection},
    extract::ApiJson,
    transaction::{Transaction, TransactionInput, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: SharedConnection,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 Created and the stored transaction, or 400 Bad Request
/// if the input is invalid.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let transaction = input.validate(OffsetDateTime::now_utc())?;

    let connection = lock_connection(&state.db_connection)?;

    let transaction = create_transaction(transaction, &connection)
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    tracing::debug!("created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        ErrorBody,
        category::{Category, TransactionKind},
        extract::ApiJson,
        test_utils::{assert_status, get_shared_test_connection, parse_json_body},
        transaction::{Transaction, TransactionInput, core::count_transactions},
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_state() -> CreateTransactionState {
        CreateTransactionState {
            db_connection: get_shared_test_connection(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_state();
        let date = datetime!(2025-04-10 09:30 UTC);
        let input = TransactionInput::new(45.5, TransactionKind::Expense, Category::Utilities)
            .date(date)
            .description("power bill");

        let response = create_transaction_endpoint(State(state.clone()), ApiJson(input))
            .await
            .into_response();

        assert_status(&response, StatusCode::CREATED);
        let transaction: Transaction = parse_json_body(response).await;
        assert_eq!(transaction.amount, 45.5);
        assert_eq!(transaction.date, date);
        assert_eq!(transaction.description.as_deref(), Some("power bill"));
        assert_eq!(transaction.category, Category::Utilities);
    }

    #[tokio::test]
    async fn date_defaults_to_now() {
        let before = OffsetDateTime::now_utc() - time::Duration::seconds(1);
        let input = TransactionInput::new(5.0, TransactionKind::Income, Category::Freelance);

        let response = create_transaction_endpoint(State(get_state()), ApiJson(input))
            .await
            .into_response();

        let transaction: Transaction = parse_json_body(response).await;
        assert!(transaction.date >= before);
        assert!(transaction.date <= OffsetDateTime::now_utc());
    }

    #[tokio::test]
    async fn invalid_input_is_bad_request_and_not_stored() {
        let state = get_state();
        let input = TransactionInput::new(5.0, TransactionKind::Income, Category::Food);

        let response = create_transaction_endpoint(State(state.clone()), ApiJson(input))
            .await
            .into_response();

        assert_status(&response, StatusCode::BAD_REQUEST);
        let body: ErrorBody = parse_json_body(response).await;
        assert!(body.error.contains("food"), "got {}", body.error);
        let count = count_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(count, 0);
    }
}
