use std::time::Instant;

use chrono::Utc;

use crate::{
    dto::storefront::{
        CatalogResponse, CheckoutResponse, ModalPhases, PairingView, PaymentPrompt,
        PromotionPrompt, SpinResponse, StorefrontFragment, StorefrontSnapshot,
    },
    error::{AppError, AppResult},
    models::CurrentPromotion,
    money::format_inr,
    response::{ApiResponse, Meta},
    spin::SpinWheel,
    state::{AppState, StorefrontView},
    ui::{
        i18n::{self, Language},
        pairing::{PairingAttempt, PairingSession},
        modal::ModalPhase,
        session::{SessionFlags, Theme},
    },
    view::{
        cart::{CartView, cart_view, render_cart},
        catalog::{catalog_view, render_catalog},
        promotions::{render_banner_modal, render_spin_modal, render_spin_result},
        inventory::{ProductFilter, StockFilter},
    },
};

fn current_cart(view: &StorefrontView) -> CartView {
    let cart = view.cart.get().cloned().unwrap_or_default();
    let token = view.preferences.discount_token();
    cart_view(&cart, token.as_ref(), view.preferences.language)
}

/// Fetches `/cart` and applies it unless a newer fetch already landed.
pub async fn refresh_cart(state: &AppState) -> AppResult<bool> {
    let ticket = state.sequencers.cart.issue();
    let cart = state.backend.cart().await?;
    let mut view = state.storefront.write().await;
    Ok(view.cart.apply(ticket, cart))
}

pub async fn cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let view = state.storefront.read().await;
    Ok(ApiResponse::success(
        "Cart",
        current_cart(&view),
        Some(Meta::revision(view.cart.revision())),
    ))
}

async fn surface(state: &AppState, err: AppError) -> AppError {
    tracing::warn!(error = %err, "storefront action failed");
    state.storefront.write().await.notice = Some(err.user_message());
    err
}

pub async fn scan_item(state: &AppState, uid: &str) -> AppResult<ApiResponse<CartView>> {
    let uid = uid.trim();
    if uid.is_empty() {
        return Err(AppError::BadRequest("Missing product uid.".into()));
    }
    if let Err(err) = state
        .backend
        .scan(uid)
        .await
        .and_then(|ack| ack.accepted("Product not found"))
    {
        return Err(surface(state, err.into()).await);
    }
    tracing::info!(uid, "item scanned");
    if let Err(err) = refresh_cart(state).await {
        tracing::warn!(error = %err, "cart refresh after scan failed");
    }
    cart(state).await
}

pub async fn remove_item(state: &AppState, uid: &str) -> AppResult<ApiResponse<CartView>> {
    if let Err(err) = state
        .backend
        .remove_from_cart(uid.trim())
        .await
        .and_then(|ack| ack.accepted("Item not in cart"))
    {
        return Err(surface(state, err.into()).await);
    }
    if let Err(err) = refresh_cart(state).await {
        tracing::warn!(error = %err, "cart refresh after removal failed");
    }
    cart(state).await
}

pub async fn load_catalog(state: &AppState) -> AppResult<bool> {
    let ticket = state.sequencers.catalog.issue();
    let products = state.backend.products().await?;
    let mut view = state.storefront.write().await;
    Ok(view.catalog.apply(ticket, products))
}

pub async fn catalog(
    state: &AppState,
    category: Option<&str>,
    query: Option<&str>,
) -> AppResult<ApiResponse<CatalogResponse>> {
    if !state.storefront.read().await.catalog.is_loaded() {
        load_catalog(state).await?;
    }
    let view = state.storefront.read().await;
    let products = view.catalog.get().map(Vec::as_slice).unwrap_or_default();
    let filter = ProductFilter::new(query, category, StockFilter::All);
    let catalog = catalog_view(products, &filter, view.preferences.language);
    let meta = Meta::new(catalog.cards.len(), products.len(), view.catalog.revision());
    let html = render_catalog(&catalog)?;

    Ok(ApiResponse::success(
        "Catalog",
        CatalogResponse { catalog, html },
        Some(meta),
    ))
}

pub async fn begin_payment(state: &AppState) -> AppResult<ApiResponse<PaymentPrompt>> {
    let mut view = state.storefront.write().await;
    let cart = current_cart(&view);
    if !cart.checkout_enabled {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    view.modals.payment.open(Instant::now());
    let prompt = PaymentPrompt {
        amount: format_inr(cart.totals.total),
        discount_percent: view.preferences.checkout_discount(),
    };
    Ok(ApiResponse::success("Payment", prompt, None))
}

/// Sends `/checkout` with the stored prize percent. The prize is only
/// consumed once the backend accepts the order.
pub async fn confirm_payment(state: &AppState) -> AppResult<ApiResponse<CheckoutResponse>> {
    let discount = state.storefront.read().await.preferences.checkout_discount();

    let ack = match state
        .backend
        .checkout(discount)
        .await
        .and_then(|ack| ack.accepted("Checkout failed"))
    {
        Ok(ack) => ack,
        Err(err) => {
            state.storefront.write().await.modals.payment.close(Instant::now());
            return Err(surface(state, err.into()).await);
        }
    };

    {
        let now = Instant::now();
        let mut view = state.storefront.write().await;
        view.preferences.spin_discount = None;
        view.receipt = ack.order.clone();
        view.notice = None;
        view.modals.payment.close(now);
        view.modals.success.open(now);
    }
    tracing::info!(discount, "checkout completed");

    if let Err(err) = refresh_cart(state).await {
        tracing::warn!(error = %err, "cart refresh after checkout failed");
    }

    let data = CheckoutResponse {
        receipt: ack.order,
        message: ack
            .message
            .unwrap_or_else(|| "Checkout successful".to_string()),
    };
    Ok(ApiResponse::success("Checkout", data, None))
}

pub async fn finish_payment(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    state
        .storefront
        .write()
        .await
        .modals
        .success
        .close(Instant::now());
    if let Err(err) = refresh_cart(state).await {
        tracing::warn!(error = %err, "cart refresh failed");
    }
    cart(state).await
}

/// Spin wheel first, once per session; otherwise a banner whose id differs
/// from the last one shown.
pub fn decide_prompt(
    view: &mut StorefrontView,
    current: CurrentPromotion,
    now: Instant,
) -> PromotionPrompt {
    if let Some(wheel) = current.spin_wheel.filter(|_| !view.session.spin_wheel_shown) {
        let wheel = SpinWheel::from_promotion(&wheel);
        view.session.spin_wheel_shown = true;
        view.wheel = Some(wheel.clone());
        view.modals.spin.open(now);
        return PromotionPrompt {
            spin_wheel: Some(wheel),
            banner: None,
        };
    }

    if let Some(banner) = current.banner.filter(|b| view.last_banner_id != Some(b.id)) {
        view.last_banner_id = Some(banner.id);
        view.banner = Some(banner.clone());
        view.modals.promotion.open(now);
        return PromotionPrompt {
            spin_wheel: None,
            banner: Some(banner),
        };
    }

    PromotionPrompt::default()
}

pub async fn poll_promotions(state: &AppState) -> AppResult<PromotionPrompt> {
    let current = state.backend.current_promotion().await?;
    let mut view = state.storefront.write().await;
    let prompt = decide_prompt(&mut view, current, Instant::now());
    if let Some(wheel) = &prompt.spin_wheel {
        tracing::info!(promotion = ?wheel.promotion_id, "showing spin wheel");
    }
    if let Some(banner) = &prompt.banner {
        tracing::info!(promotion = banner.id, "showing banner");
    }
    Ok(prompt)
}

pub async fn close_promotion(state: &AppState) -> AppResult<ApiResponse<ModalPhases>> {
    let mut view = state.storefront.write().await;
    let now = Instant::now();
    view.modals.promotion.close(now);
    view.modals.spin.close(now);
    Ok(ApiResponse::success("Closed", phases(&mut view), None))
}

pub async fn spin(state: &AppState) -> AppResult<ApiResponse<SpinResponse>> {
    let mut view = state.storefront.write().await;
    let now = Instant::now();
    view.modals.spin.tick(now);
    let on_screen = matches!(view.modals.spin.phase(), ModalPhase::Opening | ModalPhase::Open);
    // One spin per wheel shown.
    let Some(wheel) = view.wheel.take_if(|_| on_screen) else {
        return Err(AppError::BadRequest("No spin wheel to spin".to_string()));
    };
    let outcome = wheel.spin(&mut *state.rng());

    if outcome.wins_discount {
        view.preferences.spin_discount = Some(outcome.prize.clone());
    }
    view.last_spin = Some(outcome.clone());
    tracing::info!(prize = %outcome.prize, "wheel spun");

    let data = SpinResponse {
        outcome,
        cart: current_cart(&view),
    };
    Ok(ApiResponse::success("Spin", data, None))
}

pub async fn set_language(state: &AppState, code: &str) -> AppResult<ApiResponse<CartView>> {
    let language = Language::from_code(code)
        .ok_or_else(|| AppError::BadRequest(format!("Unsupported language {code}")))?;
    let mut view = state.storefront.write().await;
    view.preferences.language = language;
    Ok(ApiResponse::success(
        i18n::language_changed_toast(language),
        current_cart(&view),
        None,
    ))
}

pub async fn set_theme(state: &AppState, theme: Theme) -> AppResult<ApiResponse<Theme>> {
    state.storefront.write().await.preferences.theme = theme;
    Ok(ApiResponse::success("Theme", theme, None))
}

/// New customer: session flags, the last banner and any pending prize go.
pub async fn reset_session(state: &AppState) -> AppResult<ApiResponse<StorefrontSnapshot>> {
    {
        let mut view = state.storefront.write().await;
        view.session = SessionFlags::default();
        view.preferences.spin_discount = None;
        view.last_banner_id = None;
        view.banner = None;
        view.wheel = None;
        view.last_spin = None;
        view.receipt = None;
        view.notice = None;
        view.pairing = PairingSession::restored(view.session.phone_connected);
        view.modals = Default::default();
        tracing::info!(session = %view.session.id, "storefront session reset");
    }
    snapshot(state).await
}

fn phases(view: &mut StorefrontView) -> ModalPhases {
    let now = Instant::now();
    let modals = &mut view.modals;
    for modal in [
        &mut modals.promotion,
        &mut modals.spin,
        &mut modals.payment,
        &mut modals.success,
        &mut modals.pairing,
    ] {
        modal.tick(now);
    }
    ModalPhases {
        promotion: modals.promotion.phase(),
        spin: modals.spin.phase(),
        payment: modals.payment.phase(),
        success: modals.success.phase(),
        pairing: modals.pairing.phase(),
    }
}

pub async fn snapshot(state: &AppState) -> AppResult<ApiResponse<StorefrontSnapshot>> {
    let mut view = state.storefront.write().await;
    let modals = phases(&mut view);
    let data = StorefrontSnapshot {
        cart: current_cart(&view),
        language: view.preferences.language.code().to_string(),
        theme: view.preferences.theme,
        spin_discount: view.preferences.spin_discount.clone(),
        settings: view.settings.clone(),
        banner: view.banner.clone(),
        wheel: view.wheel.clone(),
        modals,
        session_id: view.session.id,
        phone_connected: view.session.phone_connected,
        notice: view.notice.clone(),
    };
    Ok(ApiResponse::success(
        "Storefront",
        data,
        Some(Meta::revision(view.cart.revision())),
    ))
}

pub async fn refresh_settings(state: &AppState) -> AppResult<()> {
    let settings = state.backend.settings().await?;
    state.storefront.write().await.settings = Some(settings);
    Ok(())
}

fn pairing_view(view: &StorefrontView) -> PairingView {
    let (icon_color, icon) = view.pairing.state().icon();
    PairingView {
        state: view.pairing.state(),
        icon_color: icon_color.to_string(),
        icon: icon.to_string(),
        qr_payload: view.pairing.data().map(|d| d.qr_payload()),
        countdown: view.pairing.countdown_label(),
        countdown_class: view.pairing.countdown_class().to_string(),
    }
}

pub async fn pairing(state: &AppState) -> AppResult<ApiResponse<PairingView>> {
    let view = state.storefront.read().await;
    Ok(ApiResponse::success("Pairing", pairing_view(&view), None))
}

pub async fn open_pairing(state: &AppState) -> AppResult<ApiResponse<PairingView>> {
    let mut view = state.storefront.write().await;
    let data = view.pairing.open(&mut *state.rng(), Utc::now()).clone();
    view.session.pairing_data = Some(data);
    view.modals.pairing.open(Instant::now());
    Ok(ApiResponse::success("Pairing", pairing_view(&view), None))
}

/// One second of the QR countdown; a fresh code is issued at zero.
pub async fn tick_pairing(state: &AppState) -> AppResult<()> {
    let mut view = state.storefront.write().await;
    if view.pairing.tick_second(&mut *state.rng(), Utc::now()) {
        view.session.pairing_data = view.pairing.data().cloned();
        tracing::debug!("pairing code refreshed");
    }
    Ok(())
}

/// The phone scanned the code. The handshake is simulated: it settles after
/// a short random delay and usually succeeds.
pub async fn phone_scanned(state: &AppState) -> AppResult<ApiResponse<PairingView>> {
    let attempt = {
        let mut view = state.storefront.write().await;
        if !view.pairing.begin_connecting() {
            return Err(AppError::BadRequest("No pairing code is displayed.".into()));
        }
        PairingAttempt::simulate(&mut *state.rng())
    };

    let storefront = state.storefront.clone();
    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = tokio::time::sleep(attempt.delay) => {
                let mut view = storefront.write().await;
                view.pairing.finish(attempt.succeeds);
                if attempt.succeeds {
                    view.session.phone_connected = true;
                    view.modals.pairing.close(Instant::now());
                }
                tracing::info!(connected = attempt.succeeds, "phone pairing settled");
            }
        }
    });

    pairing(state).await
}

pub async fn retry_pairing(state: &AppState) -> AppResult<ApiResponse<PairingView>> {
    let mut view = state.storefront.write().await;
    view.pairing.retry(&mut *state.rng(), Utc::now());
    view.session.pairing_data = view.pairing.data().cloned();
    Ok(ApiResponse::success("Pairing", pairing_view(&view), None))
}

pub async fn close_pairing(state: &AppState) -> AppResult<ApiResponse<PairingView>> {
    let mut view = state.storefront.write().await;
    view.pairing.close();
    view.modals.pairing.close(Instant::now());
    Ok(ApiResponse::success("Pairing", pairing_view(&view), None))
}

/// Renders one piece of the trolley screen. Hidden modals render empty.
pub async fn fragment(state: &AppState, part: StorefrontFragment) -> AppResult<String> {
    let view = state.storefront.read().await;
    let lang = view.preferences.language;
    let html = match part {
        StorefrontFragment::Cart => render_cart(&current_cart(&view), lang)?,
        StorefrontFragment::Promotion => match (&view.wheel, &view.banner) {
            (Some(wheel), _) if view.modals.spin.is_visible() => render_spin_modal(wheel, lang)?,
            (_, Some(banner)) if view.modals.promotion.is_visible() => {
                render_banner_modal(banner, lang)?
            }
            _ => String::new(),
        },
        StorefrontFragment::SpinResult => view
            .last_spin
            .as_ref()
            .map(|outcome| render_spin_result(outcome, lang))
            .transpose()?
            .unwrap_or_default(),
    };
    Ok(html)
}
