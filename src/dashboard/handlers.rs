//! The dashboard JSON endpoint.

use axum::{
    Json,
    extract::{FromRef, State},
};

use crate::{
    AppState, Error,
    budget::get_budgets_for_period,
    dashboard::view::Dashboard,
    db::{SharedConnection, lock_connection},
    period::Period,
    timezone::timezone_or_error,
    transaction::get_all_transactions,
};

/// The state needed for computing the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: SharedConnection,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler returning every dashboard summary for the current month.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<Dashboard>, Error> {
    let local_timezone = timezone_or_error(&state.local_timezone)?;
    let period = Period::current(local_timezone);

    let connection = lock_connection(&state.db_connection)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let budgets = get_budgets_for_period(period, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets for {period}: {error}"))?;

    Ok(Json(Dashboard::compute(
        &transactions,
        &budgets,
        period,
        local_timezone,
    )))
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use time::OffsetDateTime;

    use crate::{
        budget::{BudgetInput, upsert_budget},
        category::{Category, TransactionKind},
        dashboard::UtilizationLevel,
        period::Period,
        test_utils::{assert_status, get_shared_test_connection},
        timezone::get_timezone,
        transaction::{TransactionInput, create_transaction},
    };

    use super::{DashboardState, get_dashboard_endpoint};

    fn get_state() -> DashboardState {
        DashboardState {
            db_connection: get_shared_test_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn dashboard_covers_current_period() {
        let state = get_state();
        let now = OffsetDateTime::now_utc();
        let current = Period::current(get_timezone("Etc/UTC").unwrap());
        {
            let connection = state.db_connection.lock().unwrap();
            for input in [
                TransactionInput::new(100.0, TransactionKind::Income, Category::Salary),
                TransactionInput::new(40.0, TransactionKind::Expense, Category::Food),
                TransactionInput::new(10.0, TransactionKind::Expense, Category::Food),
            ] {
                create_transaction(input.validate(now).unwrap(), &connection).unwrap();
            }
            upsert_budget(
                BudgetInput::new(Category::Food, 100.0)
                    .validate(current)
                    .unwrap(),
                &connection,
            )
            .unwrap();
        }

        let Json(dashboard) = get_dashboard_endpoint(State(state))
            .await
            .expect("Could not get dashboard");

        assert_eq!(dashboard.period, current);
        assert_eq!(dashboard.summary.income, 100.0);
        assert_eq!(dashboard.summary.expense, 50.0);
        assert_eq!(dashboard.summary.net, 50.0);
        assert_eq!(dashboard.budget_vs_actual.len(), 1);
        assert_eq!(dashboard.budget_vs_actual[0].actual, 50.0);
        assert_eq!(dashboard.insight.utilization, 50.0);
        assert_eq!(dashboard.insight.level, UtilizationLevel::Healthy);
        assert_eq!(dashboard.recent.len(), 3);
    }

    #[tokio::test]
    async fn empty_database_gives_empty_dashboard() {
        let response = get_dashboard_endpoint(State(get_state()))
            .await
            .into_response();

        assert_status(&response, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_timezone_is_server_error() {
        let state = DashboardState {
            local_timezone: "Not/AZone".to_owned(),
            ..get_state()
        };

        let response = get_dashboard_endpoint(State(state)).await.into_response();

        assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
