use axum::{
    Json, Router,
    http::{HeaderName, Request, Response, StatusCode, Uri},
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::{net::SocketAddr, sync::Arc, time::Duration};

use trolley_console::{
    backend::HttpBackend,
    config::AppConfig,
    polling::spawn_poller,
    response::{ApiResponse, Meta},
    routes::{create_api_router, doc::scalar_docs, health},
    services::{admin_service, storefront_service, worker_service},
    state::AppState,
};

const PAIRING_TICK: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,trolley_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let backend = HttpBackend::new(&config.backend_url, config.backend_timeout)?;
    tracing::info!(backend = %config.backend_url, "store server configured");
    let state = AppState::new(config.clone(), Arc::new(backend));

    spawn_pollers(&state);

    let api_router = create_api_router();
    let concurrency_limit_layer = ConcurrencyLimitLayer::new(100);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_request(|request: &Request<_>, _span: &tracing::Span| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info!(
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                "request started"
            );
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    let shutdown = state.shutdown.clone();
    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_router)
        .merge(scalar_docs())
        .fallback(not_found)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(
            request_id_header.clone(),
        ))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid,
        ))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(concurrency_limit_layer)
        .with_state(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    let serve_shutdown = shutdown.clone();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = serve_shutdown.cancelled() => {}
            }
        })
        .await?;

    shutdown.cancel();
    tracing::info!("server stopped");
    Ok(())
}

/// Background refreshes for the three consoles. Each poller stops with the
/// server.
fn spawn_pollers(state: &AppState) {
    let polling = state.config.polling.clone();

    let s = state.clone();
    spawn_poller("cart", polling.cart, state.shutdown.clone(), move || {
        let s = s.clone();
        async move { storefront_service::refresh_cart(&s).await.map(|_| ()) }
    });

    let s = state.clone();
    spawn_poller("promotions", polling.promotions, state.shutdown.clone(), move || {
        let s = s.clone();
        async move { storefront_service::poll_promotions(&s).await.map(|_| ()) }
    });

    let s = state.clone();
    spawn_poller("settings", polling.promotions, state.shutdown.clone(), move || {
        let s = s.clone();
        async move { storefront_service::refresh_settings(&s).await }
    });

    let s = state.clone();
    spawn_poller("pairing", PAIRING_TICK, state.shutdown.clone(), move || {
        let s = s.clone();
        async move { storefront_service::tick_pairing(&s).await }
    });

    // Analytics only once the dashboard has been opened.
    let s = state.clone();
    spawn_poller("analytics", polling.analytics, state.shutdown.clone(), move || {
        let s = s.clone();
        async move {
            if !s.admin.read().await.snapshot.is_loaded() {
                return Ok(());
            }
            admin_service::refresh_analytics(&s).await.map(|_| ())
        }
    });

    let s = state.clone();
    spawn_poller("worker_products", polling.worker_products, state.shutdown.clone(), move || {
        let s = s.clone();
        async move {
            if !s.worker.read().await.logged_in {
                return Ok(());
            }
            worker_service::fetch_products(&s).await.map(|_| ())
        }
    });
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
