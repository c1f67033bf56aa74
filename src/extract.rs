//! Request extractors that reject with [Error] so that malformed bodies and
//! query strings get the same JSON error response as validation errors.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};

use crate::Error;

/// Like [Json], but rejects with [Error::InvalidRequest].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;

        Ok(Self(value))
    }
}

/// Like [Query], but rejects with [Error::InvalidRequest].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;

        Ok(Self(value))
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {rejection}");
        Error::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use serde::Deserialize;

    use crate::ErrorBody;

    use super::{ApiJson, ApiQuery};

    #[derive(Debug, Deserialize)]
    struct Item {
        amount: f64,
    }

    #[derive(Debug, Deserialize)]
    struct Page {
        page: Option<u8>,
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(
                "/items",
                post(|ApiJson(item): ApiJson<Item>| async move { item.amount.to_string() }),
            )
            .route(
                "/pages",
                get(|ApiQuery(page): ApiQuery<Page>| async move { format!("{:?}", page.page) }),
            );

        TestServer::new(app)
    }

    #[tokio::test]
    async fn valid_json_is_extracted() {
        let server = get_test_server();

        let response = server
            .post("/items")
            .json(&serde_json::json!({ "amount": 12.5 }))
            .await;

        response.assert_status_ok();
        response.assert_text("12.5");
    }

    #[tokio::test]
    async fn wrong_field_type_is_bad_request_with_error_body() {
        let server = get_test_server();

        let response = server
            .post("/items")
            .json(&serde_json::json!({ "amount": "12" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorBody = response.json();
        assert!(body.error.contains("amount"), "got {}", body.error);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post("/items")
            .text("{\"amount\": ")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let _: ErrorBody = response.json();
    }

    #[tokio::test]
    async fn out_of_range_query_is_bad_request_with_error_body() {
        let server = get_test_server();

        let response = server.get("/pages").add_query_param("page", 300).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorBody = response.json();
        assert!(body.error.contains("page"), "got {}", body.error);
    }
}
