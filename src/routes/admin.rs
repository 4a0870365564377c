use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Html,
    routing::{get, post, put},
};

use crate::{
    dto::admin::{
        AdminInventory, ChatRequest, ChatResponse, DashboardFragment, DashboardResponse,
        DateRangeRequest, LegacyCharts,
    },
    error::AppResult,
    models::{Ack, Credentials},
    response::ApiResponse,
    routes::params::InventoryQuery,
    services::admin_service,
    state::AppState,
    view::analytics::SalesTab,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .route("/dashboard/tab/{tab}", put(select_tab))
        .route("/dashboard/range", put(set_date_range))
        .route("/inventory", get(inventory))
        .route("/charts", get(legacy_charts))
        .route("/chat", post(chat))
        .route("/fragments/{part}", get(fragment))
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<Ack>),
        (status = 422, description = "Invalid credentials"),
    ),
    tag = "Admin"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = admin_service::login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Analytics dashboard", body = ApiResponse<DashboardResponse>),
        (status = 502, description = "Analytics unavailable"),
    ),
    tag = "Admin"
)]
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<ApiResponse<DashboardResponse>>> {
    let resp = admin_service::dashboard(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/dashboard/refresh",
    responses(
        (status = 200, description = "Analytics re-fetched", body = ApiResponse<DashboardResponse>)
    ),
    tag = "Admin"
)]
pub async fn refresh_dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardResponse>>> {
    admin_service::refresh_analytics(&state).await?;
    let resp = admin_service::dashboard(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/dashboard/tab/{tab}",
    params(
        ("tab" = SalesTab, Path, description = "hourly, daily, weekly or monthly")
    ),
    responses(
        (status = 200, description = "Chart redrawn for the tab", body = ApiResponse<DashboardResponse>)
    ),
    tag = "Admin"
)]
pub async fn select_tab(
    State(state): State<AppState>,
    Path(tab): Path<SalesTab>,
) -> AppResult<Json<ApiResponse<DashboardResponse>>> {
    let resp = admin_service::select_tab(&state, tab).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/dashboard/range",
    request_body = DateRangeRequest,
    responses(
        (status = 200, description = "Analytics re-fetched for the range", body = ApiResponse<DashboardResponse>)
    ),
    tag = "Admin"
)]
pub async fn set_date_range(
    State(state): State<AppState>,
    Json(payload): Json<DateRangeRequest>,
) -> AppResult<Json<ApiResponse<DashboardResponse>>> {
    let resp = admin_service::set_date_range(&state, payload.end_date).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/inventory",
    params(
        ("q" = Option<String>, Query, description = "Search by name or id"),
        ("category" = Option<String>, Query, description = "Category, `all` for every category"),
        ("stock" = Option<String>, Query, description = "all, instock, lowstock or outstock")
    ),
    responses(
        (status = 200, description = "Filtered inventory", body = ApiResponse<AdminInventory>)
    ),
    tag = "Admin"
)]
pub async fn inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<ApiResponse<AdminInventory>>> {
    let resp = admin_service::inventory(&state, query.filter()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/charts",
    responses(
        (status = 200, description = "Daily and monthly sales charts", body = ApiResponse<LegacyCharts>)
    ),
    tag = "Admin"
)]
pub async fn legacy_charts(State(state): State<AppState>) -> AppResult<Json<ApiResponse<LegacyCharts>>> {
    let resp = admin_service::legacy_charts(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ApiResponse<ChatResponse>)
    ),
    tag = "Admin"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ApiResponse<ChatResponse>>> {
    let resp = admin_service::chat(&state, &payload.message).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/fragments/{part}",
    params(
        ("part" = DashboardFragment, Path, description = "kpis, summary, daily-table, categories or chat")
    ),
    responses(
        (status = 200, description = "HTML fragment", body = String, content_type = "text/html")
    ),
    tag = "Admin"
)]
pub async fn fragment(
    State(state): State<AppState>,
    Path(part): Path<DashboardFragment>,
) -> AppResult<Html<String>> {
    let html = admin_service::fragment(&state, part).await?;
    Ok(Html(html))
}
