//! A backend that talks to the JSON API over HTTP.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    Error, ErrorBody,
    budget::{Budget, BudgetInput},
    database_id::{BudgetId, TransactionId},
    endpoints::{self, format_endpoint},
    period::Period,
    store::{BudgetBackend, TransactionBackend},
    transaction::{DeletedMessage, Transaction, TransactionInput, TransactionPatch},
};

/// An HTTP client for the transaction and budget endpoints.
///
/// Requests have no timeout and are not retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. "http://localhost:3000".
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client that sends requests with an existing [reqwest::Client].
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Self { base_url, client }
    }

    /// The URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Parse a successful response body, or turn an error response into [Error::Api].
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
    };

    tracing::debug!("request failed with {status}: {message}");

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

impl TransactionBackend for ApiClient {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        let response = self
            .client
            .get(self.url(endpoints::TRANSACTIONS_API))
            .send()
            .await?;

        parse_response(response).await
    }

    async fn create_transaction(&self, input: TransactionInput) -> Result<Transaction, Error> {
        let response = self
            .client
            .post(self.url(endpoints::TRANSACTIONS_API))
            .json(&input)
            .send()
            .await?;

        parse_response(response).await
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let response = self
            .client
            .put(self.url(&format_endpoint(endpoints::TRANSACTION, id)))
            .json(&patch)
            .send()
            .await?;

        parse_response(response).await
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.url(&format_endpoint(endpoints::TRANSACTION, id)))
            .send()
            .await?;

        parse_response::<DeletedMessage>(response).await.map(|_| ())
    }
}

impl BudgetBackend for ApiClient {
    async fn list_budgets(&self, period: Option<Period>) -> Result<Vec<Budget>, Error> {
        let url = match period {
            Some(period) => format!(
                "{}?month={}&year={}",
                self.url(endpoints::BUDGETS_API),
                period.month(),
                period.year()
            ),
            None => self.url(endpoints::BUDGETS_API),
        };

        let response = self.client.get(url).send().await?;

        parse_response(response).await
    }

    async fn upsert_budget(&self, input: BudgetInput) -> Result<Budget, Error> {
        let response = self
            .client
            .post(self.url(endpoints::BUDGETS_API))
            .json(&input)
            .send()
            .await?;

        parse_response(response).await
    }

    async fn delete_budget(&self, id: BudgetId) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.url(&format_endpoint(endpoints::BUDGET, id)))
            .send()
            .await?;

        parse_response::<DeletedMessage>(response).await.map(|_| ())
    }
}
