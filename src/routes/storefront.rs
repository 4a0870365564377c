use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Html,
    routing::{delete, get, post, put},
};

use crate::{
    dto::storefront::{
        CatalogResponse, CheckoutResponse, LanguageRequest, ModalPhases, PairingView,
        PaymentPrompt, PromotionPrompt, ScanRequest, SpinResponse, StorefrontFragment,
        StorefrontSnapshot, ThemeRequest,
    },
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::CatalogQuery,
    services::storefront_service,
    state::AppState,
    ui::session::Theme,
    view::cart::CartView,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(snapshot))
        .route("/cart", get(cart_view))
        .route("/cart/{uid}", delete(remove_item))
        .route("/scan", post(scan_item))
        .route("/catalog", get(catalog))
        .route("/payment", post(begin_payment))
        .route("/payment/confirm", post(confirm_payment))
        .route("/payment/finish", post(finish_payment))
        .route("/promotions", get(poll_promotions))
        .route("/promotions/close", post(close_promotion))
        .route("/spin", post(spin))
        .route("/language", put(set_language))
        .route("/theme", put(set_theme))
        .route("/session/reset", post(reset_session))
        .route("/pairing", get(pairing).post(open_pairing).delete(close_pairing))
        .route("/pairing/scan", post(phone_scanned))
        .route("/pairing/retry", post(retry_pairing))
        .route("/fragments/{part}", get(fragment))
}

#[utoipa::path(
    get,
    path = "/api/storefront",
    responses(
        (status = 200, description = "Trolley screen state", body = ApiResponse<StorefrontSnapshot>)
    ),
    tag = "Storefront"
)]
pub async fn snapshot(State(state): State<AppState>) -> AppResult<Json<ApiResponse<StorefrontSnapshot>>> {
    let resp = storefront_service::snapshot(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/storefront/cart",
    responses(
        (status = 200, description = "Cart with totals", body = ApiResponse<CartView>)
    ),
    tag = "Storefront"
)]
pub async fn cart_view(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = storefront_service::cart(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Item scanned into the cart", body = ApiResponse<CartView>),
        (status = 400, description = "Missing uid"),
        (status = 422, description = "Product not found"),
    ),
    tag = "Storefront"
)]
pub async fn scan_item(
    State(state): State<AppState>,
    Json(payload): Json<ScanRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = storefront_service::scan_item(&state, &payload.uid).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/storefront/cart/{uid}",
    params(
        ("uid" = String, Path, description = "Product uid")
    ),
    responses(
        (status = 200, description = "One unit removed", body = ApiResponse<CartView>),
    ),
    tag = "Storefront"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = storefront_service::remove_item(&state, &uid).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/storefront/catalog",
    params(
        ("category" = Option<String>, Query, description = "Category, `all` for every category"),
        ("q" = Option<String>, Query, description = "Search text")
    ),
    responses(
        (status = 200, description = "Product catalog", body = ApiResponse<CatalogResponse>)
    ),
    tag = "Storefront"
)]
pub async fn catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<CatalogResponse>>> {
    let resp =
        storefront_service::catalog(&state, query.category.as_deref(), query.q.as_deref()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/payment",
    responses(
        (status = 200, description = "Payment modal opened", body = ApiResponse<PaymentPrompt>),
        (status = 400, description = "Cart is empty"),
    ),
    tag = "Storefront"
)]
pub async fn begin_payment(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PaymentPrompt>>> {
    let resp = storefront_service::begin_payment(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/payment/confirm",
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<CheckoutResponse>),
        (status = 422, description = "Checkout rejected"),
    ),
    tag = "Storefront"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let resp = storefront_service::confirm_payment(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/payment/finish",
    responses(
        (status = 200, description = "Success modal dismissed", body = ApiResponse<CartView>)
    ),
    tag = "Storefront"
)]
pub async fn finish_payment(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = storefront_service::finish_payment(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/storefront/promotions",
    responses(
        (status = 200, description = "Campaign to show now, if any", body = ApiResponse<PromotionPrompt>)
    ),
    tag = "Storefront"
)]
pub async fn poll_promotions(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<PromotionPrompt>>> {
    let prompt = storefront_service::poll_promotions(&state).await?;
    let message = if prompt.is_empty() { "No promotion" } else { "Promotion" };
    Ok(Json(ApiResponse::success(message, prompt, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/storefront/promotions/close",
    responses(
        (status = 200, description = "Promotion modals closing", body = ApiResponse<ModalPhases>)
    ),
    tag = "Storefront"
)]
pub async fn close_promotion(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ModalPhases>>> {
    let resp = storefront_service::close_promotion(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/spin",
    responses(
        (status = 200, description = "Wheel spun", body = ApiResponse<SpinResponse>)
    ),
    tag = "Storefront"
)]
pub async fn spin(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SpinResponse>>> {
    let resp = storefront_service::spin(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/storefront/language",
    request_body = LanguageRequest,
    responses(
        (status = 200, description = "Language changed", body = ApiResponse<CartView>),
        (status = 400, description = "Unsupported language"),
    ),
    tag = "Storefront"
)]
pub async fn set_language(
    State(state): State<AppState>,
    Json(payload): Json<LanguageRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = storefront_service::set_language(&state, &payload.language).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/storefront/theme",
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme changed", body = ApiResponse<Theme>)
    ),
    tag = "Storefront"
)]
pub async fn set_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeRequest>,
) -> AppResult<Json<ApiResponse<Theme>>> {
    let resp = storefront_service::set_theme(&state, payload.theme).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/session/reset",
    responses(
        (status = 200, description = "Session flags cleared", body = ApiResponse<StorefrontSnapshot>)
    ),
    tag = "Storefront"
)]
pub async fn reset_session(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StorefrontSnapshot>>> {
    let resp = storefront_service::reset_session(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/storefront/pairing",
    responses(
        (status = 200, description = "Phone pairing state", body = ApiResponse<PairingView>)
    ),
    tag = "Pairing"
)]
pub async fn pairing(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PairingView>>> {
    let resp = storefront_service::pairing(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/pairing",
    responses(
        (status = 200, description = "Pairing code displayed", body = ApiResponse<PairingView>)
    ),
    tag = "Pairing"
)]
pub async fn open_pairing(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PairingView>>> {
    let resp = storefront_service::open_pairing(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/pairing/scan",
    responses(
        (status = 200, description = "Handshake started", body = ApiResponse<PairingView>),
        (status = 400, description = "No pairing code is displayed"),
    ),
    tag = "Pairing"
)]
pub async fn phone_scanned(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PairingView>>> {
    let resp = storefront_service::phone_scanned(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/pairing/retry",
    responses(
        (status = 200, description = "Fresh pairing code", body = ApiResponse<PairingView>)
    ),
    tag = "Pairing"
)]
pub async fn retry_pairing(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PairingView>>> {
    let resp = storefront_service::retry_pairing(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/storefront/pairing",
    responses(
        (status = 200, description = "Pairing closed", body = ApiResponse<PairingView>)
    ),
    tag = "Pairing"
)]
pub async fn close_pairing(State(state): State<AppState>) -> AppResult<Json<ApiResponse<PairingView>>> {
    let resp = storefront_service::close_pairing(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/storefront/fragments/{part}",
    params(
        ("part" = StorefrontFragment, Path, description = "cart, promotion or spin-result")
    ),
    responses(
        (status = 200, description = "HTML fragment", body = String, content_type = "text/html")
    ),
    tag = "Storefront"
)]
pub async fn fragment(
    State(state): State<AppState>,
    Path(part): Path<StorefrontFragment>,
) -> AppResult<Html<String>> {
    let html = storefront_service::fragment(&state, part).await?;
    Ok(Html(html))
}
