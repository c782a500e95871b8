//! Router configuration for the API.
//!
//! REST routes are collected through `OpenApiRouter` so the OpenAPI document
//! is assembled from the handlers themselves.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::graphql::graphql_routes;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Routes
/// - `{prefix}/auth` - Registration, verification and login
/// - `{prefix}/users` - User directory
/// - `{prefix}/debts` - Debts and their participants
/// - `/health`, `/health/ready`, `/health/live` - Probes
/// - `/graphql` - GraphQL endpoint and GraphiQL
/// - `/swagger-ui` - OpenAPI explorer over `/api-docs/openapi.json`
///
/// # Middleware Order
/// Last added runs first: request id, then logging, so every log line and
/// error body can carry the id.
pub fn create_router(state: AppState, api_prefix: &str) -> Router {
    let prefix = api_prefix.trim_end_matches('/');

    let (api_router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(&format!("{prefix}/auth"), handlers::auth::auth_routes())
        .nest(&format!("{prefix}/users"), handlers::users::user_routes())
        .nest(&format!("{prefix}/debts"), handlers::debts::debt_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    api_router
        .merge(graphql_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::api::middleware::REQUEST_ID_HEADER;
    use crate::config::DatabaseConfig;
    use crate::db::lazy_connection_pool;
    use crate::services::test_support::{MemoryStore, RecordingMailer, sample_user};

    const PREFIX: &str = "/api/v00";

    fn router() -> (MemoryStore, Router) {
        let store = MemoryStore::default();
        let pool = lazy_connection_pool(&DatabaseConfig {
            url: "postgres://nobody@127.0.0.1:1/none".to_string(),
            ..Default::default()
        });
        let state =
            AppState::from_parts(store.services(Arc::new(RecordingMailer::default())), pool);
        (store, create_router(state, PREFIX))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn liveness_probe_answers() {
        let (_, router) = router();
        let response = router.oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn debts_health_is_plain_ok() {
        let (_, router) = router();
        let response = router
            .oneshot(get(&format!("{PREFIX}/debts/health")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn unknown_debt_is_a_json_404_with_request_id() {
        let (_, router) = router();
        let request = Request::builder()
            .uri(format!("{PREFIX}/debts/{}", Uuid::new_v4()))
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-42");
    }

    #[tokio::test]
    async fn invalid_debt_body_is_rejected() {
        let (store, router) = router();
        let ana = store.insert_user(sample_user("ana@example.com", "ana"));

        let (status, body) = send(
            router,
            json_request(
                "POST",
                &format!("{PREFIX}/debts"),
                json!({"description": "Trip", "totalAmount": 0, "createdById": ana.id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_path_id_is_a_bad_request() {
        let (_, router) = router();
        let (status, body) = send(router, get(&format!("{PREFIX}/debts/not-a-uuid"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn debt_created_over_rest_is_listed() {
        let (store, router) = router();
        let ana = store.insert_user(sample_user("ana@example.com", "ana"));

        let (status, body) = send(
            router.clone(),
            json_request(
                "POST",
                &format!("{PREFIX}/debts"),
                json!({"description": "Trip", "totalAmount": 120.5, "createdById": ana.id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "DEBT_CREATED");

        let (status, body) =
            send(router, get(&format!("{PREFIX}/debts?userId={}", ana.id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["totalAmount"], 120.5);
        assert_eq!(body[0]["status"], "PENDING");
    }

    #[tokio::test]
    async fn empty_exclude_id_lists_every_user() {
        let (store, router) = router();
        store.insert_user(sample_user("ana@example.com", "ana"));
        store.insert_user(sample_user("bob@example.com", "bob"));

        let (status, body) = send(router, get(&format!("{PREFIX}/users?excludeId="))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn oversized_total_amount_is_a_validation_error() {
        let (store, router) = router();
        let ana = store.insert_user(sample_user("ana@example.com", "ana"));

        let (status, body) = send(
            router,
            json_request(
                "POST",
                &format!("{PREFIX}/debts"),
                json!({"description": "Yacht", "totalAmount": 1e15, "createdById": ana.id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn registration_never_echoes_the_password() {
        let (_, router) = router();
        let (status, body) = send(
            router,
            json_request(
                "POST",
                &format!("{PREFIX}/auth/register"),
                json!({
                    "email": "Ana@Example.com",
                    "password": "Abcdef1!",
                    "nickname": "Ana",
                    "name": "Ana",
                    "lastName": "Lopez",
                    "phone": "+34 600 000 000"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "ana@example.com");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("code").is_none());
    }

    #[tokio::test]
    async fn paying_the_only_share_settles_the_debt() {
        let (store, router) = router();
        let ana = store.insert_user(sample_user("ana@example.com", "ana"));
        let bob = store.insert_user(sample_user("bob@example.com", "bob"));

        send(
            router.clone(),
            json_request(
                "POST",
                &format!("{PREFIX}/debts"),
                json!({"description": "Dinner", "totalAmount": 50, "createdById": ana.id}),
            ),
        )
        .await;
        let (_, debts) = send(router.clone(), get(&format!("{PREFIX}/debts?userId={}", ana.id))).await;
        let debt_id = debts[0]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            router.clone(),
            json_request(
                "POST",
                &format!("{PREFIX}/debts/{debt_id}/participants"),
                json!({"userId": bob.id, "amount": 50}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("{PREFIX}/debts/{debt_id}/participants/{}/pay", bob.id))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["debtPaid"], true);

        let (_, debt) = send(router, get(&format!("{PREFIX}/debts/{debt_id}"))).await;
        assert_eq!(debt["status"], "PAID");
    }

    #[tokio::test]
    async fn graphql_endpoint_executes_queries() {
        let (_, router) = router();
        let (status, body) = send(
            router,
            json_request("POST", "/graphql", json!({"query": "{ health }"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["health"], "ok");
    }

    #[tokio::test]
    async fn openapi_document_lists_debt_routes() {
        let (_, router) = router();
        let (status, body) = send(router, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get(format!("{PREFIX}/debts/{{debtId}}")).is_some());
    }
}
