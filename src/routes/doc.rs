use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{admin as admin_dto, storefront as storefront_dto, worker as worker_dto},
    models::{
        Ack, AnalyticsSnapshot, Cart, CartItem, Credentials, OrderSummary, Product, Promotion,
        UiSettings,
    },
    response::{ApiResponse, Meta},
    routes::{admin, health, params, storefront, worker},
    view::{analytics::SalesTab, cart::CartView, design::DesignCanvas, inventory::StockFilter},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        storefront::snapshot,
        storefront::cart_view,
        storefront::scan_item,
        storefront::remove_item,
        storefront::catalog,
        storefront::begin_payment,
        storefront::confirm_payment,
        storefront::finish_payment,
        storefront::poll_promotions,
        storefront::close_promotion,
        storefront::spin,
        storefront::set_language,
        storefront::set_theme,
        storefront::reset_session,
        storefront::pairing,
        storefront::open_pairing,
        storefront::phone_scanned,
        storefront::retry_pairing,
        storefront::close_pairing,
        storefront::fragment,
        admin::login,
        admin::dashboard,
        admin::refresh_dashboard,
        admin::select_tab,
        admin::set_date_range,
        admin::inventory,
        admin::legacy_charts,
        admin::chat,
        admin::fragment,
        worker::login,
        worker::logout,
        worker::console,
        worker::set_mode,
        worker::set_tab,
        worker::set_theme,
        worker::open_panel,
        worker::close_panel,
        worker::inventory,
        worker::add_product,
        worker::open_edit,
        worker::save_edit,
        worker::delete_product,
        worker::load_settings,
        worker::save_settings,
        worker::promotions,
        worker::delete_promotion,
        worker::deploy_spin_wheel,
        worker::chat,
        worker::canvas,
        worker::update_canvas,
        worker::apply_template,
        worker::apply_graphic,
        worker::generate_design,
        worker::deploy_banner,
        worker::fragment
    ),
    components(
        schemas(
            Ack,
            AnalyticsSnapshot,
            Cart,
            CartItem,
            CartView,
            Credentials,
            DesignCanvas,
            OrderSummary,
            Product,
            Promotion,
            SalesTab,
            StockFilter,
            UiSettings,
            params::CatalogQuery,
            params::InventoryQuery,
            storefront_dto::StorefrontSnapshot,
            storefront_dto::PromotionPrompt,
            admin_dto::DashboardResponse,
            admin_dto::AdminInventory,
            worker_dto::WorkerInventory,
            worker_dto::PromotionPool,
            worker_dto::EditProductForm,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<storefront_dto::StorefrontSnapshot>,
            ApiResponse<admin_dto::DashboardResponse>,
            ApiResponse<worker_dto::WorkerInventory>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Storefront", description = "Customer trolley screen"),
        (name = "Pairing", description = "Phone pairing on the trolley screen"),
        (name = "Admin", description = "Analytics dashboard endpoints"),
        (name = "Worker", description = "Staff inventory console. The worker session lives in this service's cookie jar for the store server, so callers send no credentials"),
        (name = "Promotions", description = "Promotion pool management"),
        (name = "Design", description = "Banner design studio"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
