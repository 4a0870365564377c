use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{OrderSummary, Promotion, UiSettings},
    spin::{SpinOutcome, SpinWheel},
    ui::{modal::ModalPhase, pairing::ConnectionState, session::Theme},
    view::{cart::CartView, catalog::CatalogView},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    pub uid: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LanguageRequest {
    /// `en`, `hi`, `ta`, `te`, `kn` or `ml`.
    pub language: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModalPhases {
    pub promotion: ModalPhase,
    pub spin: ModalPhase,
    pub payment: ModalPhase,
    pub success: ModalPhase,
    pub pairing: ModalPhase,
}

/// Everything the trolley screen draws, in one payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct StorefrontSnapshot {
    pub cart: CartView,
    pub language: String,
    pub theme: Theme,
    pub spin_discount: Option<String>,
    pub settings: Option<UiSettings>,
    pub banner: Option<Promotion>,
    pub wheel: Option<SpinWheel>,
    pub modals: ModalPhases,
    pub session_id: Uuid,
    pub phone_connected: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub catalog: CatalogView,
    pub html: String,
}

/// What a promotion poll decided to show; at most one field is set.
#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct PromotionPrompt {
    pub spin_wheel: Option<SpinWheel>,
    pub banner: Option<Promotion>,
}

impl PromotionPrompt {
    pub fn is_empty(&self) -> bool {
        self.spin_wheel.is_none() && self.banner.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpinResponse {
    pub outcome: SpinOutcome,
    /// Cart with the prize applied.
    pub cart: CartView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentPrompt {
    /// Final total shown on the payment modal, e.g. `₹336.00`.
    pub amount: String,
    /// Percent that will be sent with checkout.
    pub discount_percent: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub receipt: Option<OrderSummary>,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PairingView {
    pub state: ConnectionState,
    pub icon_color: String,
    pub icon: String,
    pub qr_payload: Option<String>,
    pub countdown: String,
    pub countdown_class: String,
}

/// Server-rendered pieces of the trolley screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StorefrontFragment {
    Cart,
    Promotion,
    SpinResult,
}
