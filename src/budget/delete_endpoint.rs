//! Defines the endpoint for deleting a budget.

use axum::{
    Json,
    extract::{FromRef, Path, State},
};

use crate::{
    AppState, Error,
    budget::delete_budget,
    database_id::BudgetId,
    db::{SharedConnection, lock_connection},
    transaction::DeletedMessage,
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: SharedConnection,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a budget. Succeeds even if the budget does not exist.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Json<DeletedMessage>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_budget(budget_id, &connection)
        .inspect_err(|error| tracing::error!("could not delete budget {budget_id}: {error}"))?;

    Ok(Json(DeletedMessage {
        message: "Budget deleted".to_owned(),
    }))
}
