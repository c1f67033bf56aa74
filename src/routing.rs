//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::{
    AppState,
    budget::{delete_budget_endpoint, list_budgets_endpoint, upsert_budget_endpoint},
    category::get_categories_endpoint,
    dashboard::get_dashboard_endpoint,
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS_API,
            get(list_budgets_endpoint).post(upsert_budget_endpoint),
        )
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(endpoints::DASHBOARD_API, get(get_dashboard_endpoint))
        .route(endpoints::CATEGORIES_API, get(get_categories_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}
