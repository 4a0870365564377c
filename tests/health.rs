mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::get,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::{MockBackend, product, state_with};
use trolley_console::routes::{create_api_router, health::health_check};

fn app() -> Router {
    let backend = MockBackend::default();
    *backend.products.lock().unwrap() = vec![product("52612D5C", "Rice Bag 5kg", "320", 50, "Grains")];
    let state = state_with(Arc::new(backend));
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", create_api_router())
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_check_returns_ok() {
    let state = state_with(Arc::new(MockBackend::default()));
    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert!(data.backend_reachable);
}

#[tokio::test]
async fn scanning_through_the_router_updates_the_cart() {
    let app = app();

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/storefront/scan")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"uid":"52612D5C"}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["item_count"], 1);

    let response = app
        .oneshot(
            Request::get("/api/storefront/fragments/cart")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .expect("header")
            .starts_with("text/html")
    );
}

#[tokio::test]
async fn backend_rejection_maps_to_unprocessable_entity() {
    let response = app()
        .oneshot(
            Request::post("/api/storefront/scan")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"uid":"UNKNOWN"}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn unknown_sales_tab_is_a_client_error() {
    let response = app()
        .oneshot(
            Request::put("/api/admin/dashboard/tab/yearly")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
