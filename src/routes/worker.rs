use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Html,
    routing::{delete, get, post, put},
};

use crate::{
    dto::{
        admin::ChatRequest,
        worker::{
            AddProductRequest, ConsoleFragment, ConsoleState, DesignOutcome, DesignRequest,
            EditProductForm, GraphicRequest, ModeRequest, PromotionPool, SettingsRequest,
            SpinWheelRequest, TabRequest, TemplateRequest, ThemeRequest, WorkerInventory,
        },
    },
    error::AppResult,
    models::{Ack, Credentials, UiSettings},
    response::ApiResponse,
    routes::params::InventoryQuery,
    services::{design_service, worker_service},
    state::{AppState, WorkerPanel},
    view::{chat::ChatLog, design::DesignCanvas},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/console", get(console))
        .route("/mode", put(set_mode))
        .route("/tab", put(set_tab))
        .route("/theme", put(set_theme))
        .route("/panels/{panel}", put(open_panel).delete(close_panel))
        .route("/products", get(inventory).post(add_product))
        .route("/products/{id}", put(save_edit).delete(delete_product))
        .route("/products/{id}/edit", get(open_edit))
        .route("/settings", get(load_settings).put(save_settings))
        .route("/promotions", get(promotions))
        .route("/promotions/{id}", delete(delete_promotion))
        .route("/promotions/spin-wheel", post(deploy_spin_wheel))
        .route("/chat", post(chat))
        .route("/design", get(canvas).put(update_canvas))
        .route("/design/template", post(apply_template))
        .route("/design/graphic", post(apply_graphic))
        .route("/design/generate", post(generate_design))
        .route("/design/deploy", post(deploy_banner))
        .route("/fragments/{part}", get(fragment))
}

#[utoipa::path(
    post,
    path = "/api/worker/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<Ack>),
        (status = 422, description = "Invalid credentials"),
    ),
    tag = "Worker"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = worker_service::login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<Ack>)
    ),
    tag = "Worker"
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = worker_service::logout(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/worker/console",
    responses(
        (status = 200, description = "Console mode, tab and canvas", body = ApiResponse<ConsoleState>)
    ),
    tag = "Worker"
)]
pub async fn console(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ConsoleState>>> {
    let resp = worker_service::state_of(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/worker/mode",
    request_body = ModeRequest,
    responses(
        (status = 200, description = "Mode switched", body = ApiResponse<ConsoleState>)
    ),
    tag = "Worker"
)]
pub async fn set_mode(
    State(state): State<AppState>,
    Json(payload): Json<ModeRequest>,
) -> AppResult<Json<ApiResponse<ConsoleState>>> {
    let resp = worker_service::set_mode(&state, payload.mode).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/worker/tab",
    request_body = TabRequest,
    responses(
        (status = 200, description = "Tab switched", body = ApiResponse<ConsoleState>)
    ),
    tag = "Worker"
)]
pub async fn set_tab(
    State(state): State<AppState>,
    Json(payload): Json<TabRequest>,
) -> AppResult<Json<ApiResponse<ConsoleState>>> {
    let resp = worker_service::set_tab(&state, payload.tab).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/worker/panels/{panel}",
    params(
        ("panel" = WorkerPanel, Path, description = "tools, ai, promotions or spin-creator")
    ),
    responses(
        (status = 200, description = "Panel opening", body = ApiResponse<ConsoleState>),
        (status = 400, description = "The editor opens from a product row")
    ),
    tag = "Worker"
)]
pub async fn open_panel(
    State(state): State<AppState>,
    Path(panel): Path<WorkerPanel>,
) -> AppResult<Json<ApiResponse<ConsoleState>>> {
    let resp = worker_service::open_panel(&state, panel).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/worker/panels/{panel}",
    params(
        ("panel" = WorkerPanel, Path, description = "edit, tools, ai, promotions or spin-creator")
    ),
    responses(
        (status = 200, description = "Panel closing", body = ApiResponse<ConsoleState>)
    ),
    tag = "Worker"
)]
pub async fn close_panel(
    State(state): State<AppState>,
    Path(panel): Path<WorkerPanel>,
) -> AppResult<Json<ApiResponse<ConsoleState>>> {
    let resp = worker_service::close_panel(&state, panel).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/worker/theme",
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme set, or toggled when omitted", body = ApiResponse<ConsoleState>)
    ),
    tag = "Worker"
)]
pub async fn set_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeRequest>,
) -> AppResult<Json<ApiResponse<ConsoleState>>> {
    let resp = worker_service::set_theme(&state, payload.theme).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/worker/products",
    params(
        ("q" = Option<String>, Query, description = "Search by name or id"),
        ("category" = Option<String>, Query, description = "Category, `all` for every category"),
        ("stock" = Option<String>, Query, description = "all, instock, lowstock or outstock")
    ),
    responses(
        (status = 200, description = "Worker inventory", body = ApiResponse<WorkerInventory>),
        (status = 401, description = "Session expired"),
    ),
    tag = "Worker"
)]
pub async fn inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<ApiResponse<WorkerInventory>>> {
    let resp = worker_service::inventory(&state, &query.filter()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/products",
    request_body = AddProductRequest,
    responses(
        (status = 200, description = "Product added", body = ApiResponse<WorkerInventory>),
        (status = 400, description = "Invalid product"),
        (status = 422, description = "Rejected by the store server"),
    ),
    tag = "Worker"
)]
pub async fn add_product(
    State(state): State<AppState>,
    Json(payload): Json<AddProductRequest>,
) -> AppResult<Json<ApiResponse<WorkerInventory>>> {
    let resp = worker_service::add_product(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/worker/products/{id}/edit",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Edit form prefilled from the row", body = ApiResponse<EditProductForm>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Worker"
)]
pub async fn open_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<EditProductForm>>> {
    let resp = worker_service::open_edit(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/worker/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = EditProductForm,
    responses(
        (status = 200, description = "Changed fields saved", body = ApiResponse<WorkerInventory>),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Worker"
)]
pub async fn save_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<EditProductForm>,
) -> AppResult<Json<ApiResponse<WorkerInventory>>> {
    payload.id = id;
    let resp = worker_service::save_edit(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/worker/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<WorkerInventory>),
        (status = 422, description = "Delete failed"),
    ),
    tag = "Worker"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<WorkerInventory>>> {
    let resp = worker_service::delete_product(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/worker/settings",
    responses(
        (status = 200, description = "Customer UI settings", body = ApiResponse<UiSettings>)
    ),
    tag = "Worker"
)]
pub async fn load_settings(State(state): State<AppState>) -> AppResult<Json<ApiResponse<UiSettings>>> {
    let resp = worker_service::load_settings(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/worker/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = ApiResponse<UiSettings>),
        (status = 400, description = "Invalid color"),
    ),
    tag = "Worker"
)]
pub async fn save_settings(
    State(state): State<AppState>,
    Json(payload): Json<SettingsRequest>,
) -> AppResult<Json<ApiResponse<UiSettings>>> {
    let resp = worker_service::save_settings(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/worker/promotions",
    responses(
        (status = 200, description = "Active promotion pool", body = ApiResponse<PromotionPool>)
    ),
    tag = "Promotions"
)]
pub async fn promotions(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PromotionPool>>> {
    let resp = worker_service::promotions(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/worker/promotions/{id}",
    params(
        ("id" = i64, Path, description = "Promotion ID")
    ),
    responses(
        (status = 200, description = "Promotion removed", body = ApiResponse<PromotionPool>),
        (status = 422, description = "Delete failed"),
    ),
    tag = "Promotions"
)]
pub async fn delete_promotion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<PromotionPool>>> {
    let resp = worker_service::delete_promotion(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/promotions/spin-wheel",
    request_body = SpinWheelRequest,
    responses(
        (status = 200, description = "Spin wheel launched", body = ApiResponse<Ack>),
        (status = 400, description = "Missing title or too few prizes"),
    ),
    tag = "Promotions"
)]
pub async fn deploy_spin_wheel(
    State(state): State<AppState>,
    Json(payload): Json<SpinWheelRequest>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = worker_service::deploy_spin_wheel(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Conversation so far", body = ApiResponse<ChatLog>)
    ),
    tag = "Worker"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ApiResponse<ChatLog>>> {
    let resp = worker_service::chat(&state, &payload.message).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/worker/design",
    responses(
        (status = 200, description = "Banner canvas", body = ApiResponse<DesignCanvas>)
    ),
    tag = "Design"
)]
pub async fn canvas(State(state): State<AppState>) -> AppResult<Json<ApiResponse<DesignCanvas>>> {
    let resp = design_service::canvas(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/worker/design",
    request_body = DesignCanvas,
    responses(
        (status = 200, description = "Canvas updated", body = ApiResponse<DesignCanvas>)
    ),
    tag = "Design"
)]
pub async fn update_canvas(
    State(state): State<AppState>,
    Json(payload): Json<DesignCanvas>,
) -> AppResult<Json<ApiResponse<DesignCanvas>>> {
    let resp = design_service::update_canvas(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/design/template",
    request_body = TemplateRequest,
    responses(
        (status = 200, description = "Template applied", body = ApiResponse<DesignCanvas>),
        (status = 400, description = "Unknown template"),
    ),
    tag = "Design"
)]
pub async fn apply_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplateRequest>,
) -> AppResult<Json<ApiResponse<DesignCanvas>>> {
    let resp = design_service::apply_template(&state, payload.index).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/design/graphic",
    request_body = GraphicRequest,
    responses(
        (status = 200, description = "Background replaced", body = ApiResponse<DesignCanvas>)
    ),
    tag = "Design"
)]
pub async fn apply_graphic(
    State(state): State<AppState>,
    Json(payload): Json<GraphicRequest>,
) -> AppResult<Json<ApiResponse<DesignCanvas>>> {
    let resp = design_service::apply_graphic(&state, &payload.url).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/design/generate",
    request_body = DesignRequest,
    responses(
        (status = 200, description = "Design applied to the canvas", body = ApiResponse<DesignOutcome>),
        (status = 400, description = "Empty description"),
        (status = 422, description = "Generation failed or no image loaded"),
    ),
    tag = "Design"
)]
pub async fn generate_design(
    State(state): State<AppState>,
    Json(payload): Json<DesignRequest>,
) -> AppResult<Json<ApiResponse<DesignOutcome>>> {
    let resp = design_service::generate_design(&state, &payload.prompt).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/worker/design/deploy",
    responses(
        (status = 200, description = "Banner added to rotation", body = ApiResponse<Ack>)
    ),
    tag = "Design"
)]
pub async fn deploy_banner(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = design_service::deploy_banner(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/worker/fragments/{part}",
    params(
        ("part" = ConsoleFragment, Path, description = "canvas, templates, graphics or chat")
    ),
    responses(
        (status = 200, description = "HTML fragment", body = String, content_type = "text/html")
    ),
    tag = "Worker"
)]
pub async fn fragment(
    State(state): State<AppState>,
    Path(part): Path<ConsoleFragment>,
) -> AppResult<Html<String>> {
    let html = worker_service::fragment(&state, part).await?;
    Ok(Html(html))
}
