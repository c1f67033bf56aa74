//! Defines the endpoint for creating or overwriting a budget.

use axum::{
    Json,
    extract::{FromRef, State},
};

use crate::{
    AppState, Error,
    budget::{Budget, BudgetInput, upsert_budget},
    db::{SharedConnection, lock_connection},
    extract::ApiJson,
    period::Period,
    timezone::timezone_or_error,
};

/// The state needed to set a budget.
#[derive(Debug, Clone)]
pub struct UpsertBudgetState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing budgets.
    pub db_connection: SharedConnection,
}

impl FromRef<AppState> for UpsertBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that sets the budget for a category and month.
///
/// Setting a budget that already exists for the category and month replaces
/// its amount and keeps its ID.
pub async fn upsert_budget_endpoint(
    State(state): State<UpsertBudgetState>,
    ApiJson(input): ApiJson<BudgetInput>,
) -> Result<Json<Budget>, Error> {
    let current = Period::current(timezone_or_error(&state.local_timezone)?);
    let budget = input.validate(current)?;

    let connection = lock_connection(&state.db_connection)?;

    let budget = upsert_budget(budget, &connection)
        .inspect_err(|error| tracing::error!("could not set budget: {error}"))?;

    tracing::debug!(
        "set {} budget for {} to {}",
        budget.category,
        budget.period(),
        budget.amount
    );

    Ok(Json(budget))
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        ErrorBody,
        budget::{Budget, BudgetInput, count_budgets},
        category::Category,
        extract::ApiJson,
        period::Period,
        test_utils::{assert_status, get_shared_test_connection, parse_json_body},
        timezone::get_timezone,
    };

    use super::{UpsertBudgetState, upsert_budget_endpoint};

    fn get_state() -> UpsertBudgetState {
        UpsertBudgetState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: get_shared_test_connection(),
        }
    }

    #[tokio::test]
    async fn missing_period_uses_current_month() {
        let input = BudgetInput::new(Category::Entertainment, 60.0);

        let Json(budget) = upsert_budget_endpoint(State(get_state()), ApiJson(input))
            .await
            .expect("Could not set budget");

        assert_eq!(budget.period(), Period::current(get_timezone("Etc/UTC").unwrap()));
        assert_eq!(budget.amount, 60.0);
    }

    #[tokio::test]
    async fn second_upsert_overwrites_amount() {
        let state = get_state();
        let period = Period::new(1, 2025).unwrap();

        let Json(first) = upsert_budget_endpoint(
            State(state.clone()),
            ApiJson(BudgetInput::new(Category::Food, 300.0).period(period)),
        )
        .await
        .unwrap();
        let Json(second) = upsert_budget_endpoint(
            State(state.clone()),
            ApiJson(BudgetInput::new(Category::Food, 450.0).period(period)),
        )
        .await
        .unwrap();

        assert_eq!(
            second,
            Budget {
                amount: 450.0,
                ..first
            }
        );
        let count = count_budgets(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn income_category_is_bad_request() {
        let input = BudgetInput::new(Category::Investments, 10.0);

        let response = upsert_budget_endpoint(State(get_state()), ApiJson(input))
            .await
            .into_response();

        assert_status(&response, StatusCode::BAD_REQUEST);
        let body: ErrorBody = parse_json_body(response).await;
        assert!(body.error.contains("investments"), "got {}", body.error);
    }
}
