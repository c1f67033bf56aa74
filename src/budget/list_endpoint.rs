//! Defines the endpoint for listing the budgets of a month.

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    budget::{Budget, get_budgets_for_period},
    db::{SharedConnection, lock_connection},
    extract::ApiQuery,
    period::Period,
    timezone::timezone_or_error,
};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct ListBudgetsState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing budgets.
    pub db_connection: SharedConnection,
}

impl FromRef<AppState> for ListBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The optional query parameters selecting a budget period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPeriodQuery {
    /// The month number, defaults to the current month.
    pub month: Option<u8>,
    /// The year, defaults to the current year.
    pub year: Option<i32>,
}

/// A route handler for the budgets of a month, in category table order.
pub async fn list_budgets_endpoint(
    State(state): State<ListBudgetsState>,
    ApiQuery(query): ApiQuery<BudgetPeriodQuery>,
) -> Result<Json<Vec<Budget>>, Error> {
    let current = Period::current(timezone_or_error(&state.local_timezone)?);
    let period = Period::new(
        query.month.unwrap_or(current.month()),
        query.year.unwrap_or(current.year()),
    )?;

    let connection = lock_connection(&state.db_connection)?;

    get_budgets_for_period(period, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error,
        budget::{Budget, BudgetInput, upsert_budget},
        category::Category,
        extract::ApiQuery,
        period::Period,
        test_utils::{assert_status, get_shared_test_connection, parse_json_body},
        timezone::get_timezone,
    };

    use super::{BudgetPeriodQuery, ListBudgetsState, list_budgets_endpoint};

    fn get_state() -> ListBudgetsState {
        ListBudgetsState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: get_shared_test_connection(),
        }
    }

    #[tokio::test]
    async fn lists_budgets_for_requested_period() {
        let state = get_state();
        let march = Period::new(3, 2024).unwrap();
        let april = Period::new(4, 2024).unwrap();
        let want = {
            let connection = state.db_connection.lock().unwrap();
            upsert_budget(
                BudgetInput::new(Category::Food, 200.0)
                    .validate(march)
                    .unwrap(),
                &connection,
            )
            .unwrap();
            upsert_budget(
                BudgetInput::new(Category::Food, 250.0)
                    .validate(april)
                    .unwrap(),
                &connection,
            )
            .unwrap()
        };

        let query = BudgetPeriodQuery {
            month: Some(4),
            year: Some(2024),
        };
        let Json(budgets) = list_budgets_endpoint(State(state), ApiQuery(query))
            .await
            .expect("Could not list budgets");

        assert_eq!(budgets, vec![want]);
    }

    #[tokio::test]
    async fn defaults_to_current_period() {
        let state = get_state();
        let current = Period::current(get_timezone("Etc/UTC").unwrap());
        let want = {
            let connection = state.db_connection.lock().unwrap();
            upsert_budget(
                BudgetInput::new(Category::Shopping, 80.0)
                    .validate(current)
                    .unwrap(),
                &connection,
            )
            .unwrap()
        };

        let response = list_budgets_endpoint(State(state), ApiQuery(BudgetPeriodQuery::default()))
            .await
            .into_response();

        assert_status(&response, StatusCode::OK);
        let budgets: Vec<Budget> = parse_json_body(response).await;
        assert_eq!(budgets, vec![want]);
    }

    #[tokio::test]
    async fn invalid_month_is_rejected() {
        let query = BudgetPeriodQuery {
            month: Some(0),
            year: Some(2024),
        };

        let result = list_budgets_endpoint(State(get_state()), ApiQuery(query)).await;

        assert_eq!(
            result.map(|Json(budgets)| budgets),
            Err(Error::InvalidPeriod {
                month: 0,
                year: 2024
            })
        );
    }
}
