mod common;

use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

use common::{MockBackend, cart_of, d, product, promotion, rejected, state_with};
use trolley_console::{
    dto::storefront::StorefrontFragment,
    error::AppError,
    models::{CurrentPromotion, PromotionKind},
    services::storefront_service,
    ui::pairing::ConnectionState,
};

fn backend() -> Arc<MockBackend> {
    let backend = MockBackend::default();
    *backend.products.lock().unwrap() = vec![
        product("52612D5C", "Rice Bag 5kg", "320", 50, "Grains"),
        product("A1B2C3D4", "Milk 1L", "60", 3, "Dairy"),
    ];
    Arc::new(backend)
}

#[tokio::test]
async fn spin_wheel_is_offered_once_per_session() -> anyhow::Result<()> {
    let backend = backend();
    *backend.current_promotion.lock().unwrap() = CurrentPromotion {
        spin_wheel: Some(promotion(7, PromotionKind::SpinWheel, "Mega Spin", &["10% OFF", "Try Again"])),
        banner: None,
    };
    let state = state_with(backend.clone());

    let first = storefront_service::poll_promotions(&state).await?;
    let wheel = first.spin_wheel.expect("wheel on first poll");
    assert_eq!(wheel.title, "Mega Spin");

    for _ in 0..3 {
        let again = storefront_service::poll_promotions(&state).await?;
        assert!(again.is_empty());
    }

    // A new customer sees it again.
    storefront_service::reset_session(&state).await?;
    let after_reset = storefront_service::poll_promotions(&state).await?;
    assert!(after_reset.spin_wheel.is_some());
    Ok(())
}

#[tokio::test]
async fn banner_shows_only_when_its_id_changes() -> anyhow::Result<()> {
    let backend = backend();
    let state = state_with(backend.clone());
    let set_banner = |id: i64| {
        *backend.current_promotion.lock().unwrap() = CurrentPromotion {
            spin_wheel: None,
            banner: Some(promotion(id, PromotionKind::Banner, "Weekend Sale", &[])),
        };
    };

    set_banner(1);
    let shown = storefront_service::poll_promotions(&state).await?;
    assert_eq!(shown.banner.map(|b| b.id), Some(1));
    assert!(storefront_service::poll_promotions(&state).await?.is_empty());

    set_banner(2);
    let rotated = storefront_service::poll_promotions(&state).await?;
    assert_eq!(rotated.banner.map(|b| b.id), Some(2));

    let html = storefront_service::fragment(&state, StorefrontFragment::Promotion).await?;
    assert!(html.contains("Weekend Sale"));
    Ok(())
}

#[tokio::test]
async fn spin_wheel_takes_priority_over_banner() -> anyhow::Result<()> {
    let backend = backend();
    *backend.current_promotion.lock().unwrap() = CurrentPromotion {
        spin_wheel: Some(promotion(7, PromotionKind::SpinWheel, "Spin", &[])),
        banner: Some(promotion(3, PromotionKind::Banner, "Banner", &[])),
    };
    let state = state_with(backend);

    let first = storefront_service::poll_promotions(&state).await?;
    assert!(first.spin_wheel.is_some());
    assert!(first.banner.is_none());

    let second = storefront_service::poll_promotions(&state).await?;
    assert!(second.spin_wheel.is_none());
    assert_eq!(second.banner.map(|b| b.id), Some(3));
    Ok(())
}

#[tokio::test]
async fn scanning_refetches_the_cart_and_applies_tax() -> anyhow::Result<()> {
    let backend = backend();
    let state = state_with(backend.clone());

    storefront_service::scan_item(&state, "52612D5C").await?;
    let resp = storefront_service::scan_item(&state, " 52612D5C ").await?;
    let cart = resp.data.expect("cart");

    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.totals.subtotal, d("640"));
    assert_eq!(cart.totals.tax, d("32"));
    assert_eq!(cart.totals.total, d("672"));
    assert!(cart.checkout_enabled);
    assert_eq!(MockBackend::count(&backend.cart_calls), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_tag_surfaces_backend_message() -> anyhow::Result<()> {
    let state = state_with(backend());

    let err = storefront_service::scan_item(&state, "FFFFFFFF")
        .await
        .expect_err("unknown uid");
    assert_eq!(err.user_message(), "Product not found");
    assert_eq!(
        state.storefront.read().await.notice.as_deref(),
        Some("Product not found")
    );
    Ok(())
}

#[tokio::test]
async fn empty_cart_cannot_start_payment() {
    let state = state_with(backend());
    storefront_service::refresh_cart(&state).await.expect("cart");

    let err = storefront_service::begin_payment(&state)
        .await
        .expect_err("empty cart");
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Cart is empty"));

    let html = storefront_service::fragment(&state, StorefrontFragment::Cart)
        .await
        .expect("fragment");
    assert!(html.contains("disabled"));
}

#[tokio::test]
async fn failed_checkout_keeps_the_prize_and_success_consumes_it() -> anyhow::Result<()> {
    let backend = backend();
    *backend.cart.lock().unwrap() = cart_of(&[("52612D5C", "Rice Bag 5kg", "320", 1)]);
    let state = state_with(backend.clone());
    storefront_service::refresh_cart(&state).await?;
    state.storefront.write().await.preferences.spin_discount = Some("10% OFF".into());

    let prompt = storefront_service::begin_payment(&state).await?.data.expect("prompt");
    assert_eq!(prompt.discount_percent, 10);
    assert_eq!(prompt.amount, "₹304.00");

    *backend.checkout_ack.lock().unwrap() = Some(rejected("Payment gateway offline"));
    let err = storefront_service::confirm_payment(&state)
        .await
        .expect_err("rejected checkout");
    assert_eq!(err.user_message(), "Payment gateway offline");
    assert_eq!(
        state.storefront.read().await.preferences.spin_discount.as_deref(),
        Some("10% OFF")
    );

    *backend.checkout_ack.lock().unwrap() = None;
    storefront_service::confirm_payment(&state).await?;
    assert_eq!(state.storefront.read().await.preferences.spin_discount, None);
    assert_eq!(*backend.checkout_discounts.lock().unwrap(), vec![10, 10]);

    let cart = storefront_service::finish_payment(&state).await?.data.expect("cart");
    assert!(cart.is_empty());
    Ok(())
}

#[tokio::test]
async fn free_item_prize_is_display_only_at_checkout() -> anyhow::Result<()> {
    let backend = backend();
    *backend.cart.lock().unwrap() = cart_of(&[("A1B2C3D4", "Milk 1L", "60", 2)]);
    let state = state_with(backend.clone());
    storefront_service::refresh_cart(&state).await?;
    state.storefront.write().await.preferences.spin_discount = Some("Free Item".into());

    let cart = storefront_service::cart(&state).await?.data.expect("cart");
    assert_eq!(cart.totals.discount, d("50"));
    assert_eq!(cart.totals.total, d("76"));

    storefront_service::confirm_payment(&state).await?;
    assert_eq!(*backend.checkout_discounts.lock().unwrap(), vec![0]);
    Ok(())
}

#[tokio::test]
async fn winning_spin_is_stored_as_the_discount() -> anyhow::Result<()> {
    let backend = backend();
    *backend.current_promotion.lock().unwrap() = CurrentPromotion {
        spin_wheel: Some(promotion(7, PromotionKind::SpinWheel, "Spin", &["20% OFF", "20% OFF"])),
        banner: None,
    };
    let state = state_with(backend);
    storefront_service::poll_promotions(&state).await?;

    let spun = storefront_service::spin(&state).await?.data.expect("spin");
    assert_eq!(spun.outcome.prize, "20% OFF");
    assert_eq!(
        state.storefront.read().await.preferences.spin_discount.as_deref(),
        Some("20% OFF")
    );
    Ok(())
}

#[tokio::test]
async fn wheel_spins_once_and_only_while_shown() -> anyhow::Result<()> {
    let backend = backend();
    let state = state_with(backend.clone());

    let err = storefront_service::spin(&state).await.expect_err("no wheel yet");
    assert!(matches!(err, AppError::BadRequest(_)));

    *backend.current_promotion.lock().unwrap() = CurrentPromotion {
        spin_wheel: Some(promotion(7, PromotionKind::SpinWheel, "Spin", &["10% OFF", "Try Again"])),
        banner: None,
    };
    storefront_service::poll_promotions(&state).await?;
    storefront_service::spin(&state).await?;

    for _ in 0..4 {
        let again = storefront_service::spin(&state).await.expect_err("already spun");
        assert!(matches!(again, AppError::BadRequest(_)));
    }
    assert!(state.storefront.read().await.wheel.is_none());
    Ok(())
}

#[tokio::test]
async fn closed_wheel_cannot_be_spun() -> anyhow::Result<()> {
    let backend = backend();
    *backend.current_promotion.lock().unwrap() = CurrentPromotion {
        spin_wheel: Some(promotion(7, PromotionKind::SpinWheel, "Spin", &["10% OFF"])),
        banner: None,
    };
    let state = state_with(backend);
    storefront_service::poll_promotions(&state).await?;
    storefront_service::close_promotion(&state).await?;

    assert!(storefront_service::spin(&state).await.is_err());
    assert_eq!(state.storefront.read().await.preferences.spin_discount, None);
    Ok(())
}

#[tokio::test]
async fn failed_cart_fetch_keeps_the_last_cart() -> anyhow::Result<()> {
    let backend = backend();
    *backend.cart.lock().unwrap() = cart_of(&[("52612D5C", "Rice Bag 5kg", "320", 1)]);
    let state = state_with(backend.clone());
    storefront_service::refresh_cart(&state).await?;
    let before = storefront_service::cart(&state).await?;
    let revision = before.meta.and_then(|m| m.revision);

    backend.cart_fails.store(true, Ordering::SeqCst);
    assert!(storefront_service::refresh_cart(&state).await.is_err());

    let after = storefront_service::cart(&state).await?;
    assert_eq!(after.meta.and_then(|m| m.revision), revision);
    let lines = after.data.expect("cart").lines;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, "52612D5C");
    Ok(())
}

#[tokio::test]
async fn accepted_scan_survives_a_failed_refresh() -> anyhow::Result<()> {
    let backend = backend();
    *backend.cart.lock().unwrap() = cart_of(&[("A1B2C3D4", "Milk 1L", "60", 1)]);
    let state = state_with(backend.clone());
    storefront_service::refresh_cart(&state).await?;

    backend.cart_fails.store(true, Ordering::SeqCst);
    let scanned = storefront_service::scan_item(&state, "52612D5C").await?;
    assert_eq!(scanned.data.expect("cart").item_count, 1);

    let removed = storefront_service::remove_item(&state, "A1B2C3D4").await?;
    assert_eq!(removed.data.expect("cart").lines[0].id, "A1B2C3D4");
    assert_eq!(state.storefront.read().await.notice, None);
    Ok(())
}

#[tokio::test]
async fn catalog_filters_by_category_and_search() -> anyhow::Result<()> {
    let state = state_with(backend());

    let dairy = storefront_service::catalog(&state, Some("Dairy"), None).await?;
    let dairy = dairy.data.expect("catalog");
    assert_eq!(dairy.catalog.cards.len(), 1);
    assert_eq!(dairy.catalog.categories, vec!["Dairy", "Grains"]);

    let search = storefront_service::catalog(&state, Some("all"), Some("RICE")).await?;
    assert_eq!(search.data.expect("catalog").catalog.cards[0].id, "52612D5C");
    Ok(())
}

#[tokio::test]
async fn unsupported_language_is_rejected() {
    let state = state_with(backend());
    assert!(storefront_service::set_language(&state, "ta").await.is_ok());
    let err = storefront_service::set_language(&state, "xx")
        .await
        .expect_err("unsupported");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test(start_paused = true)]
async fn phone_pairing_settles_after_the_handshake() -> anyhow::Result<()> {
    let state = state_with(backend());

    let opened = storefront_service::open_pairing(&state).await?.data.expect("pairing");
    assert_eq!(opened.state, ConnectionState::QrDisplay);
    assert_eq!(opened.countdown, "3:00");

    let connecting = storefront_service::phone_scanned(&state).await?.data.expect("pairing");
    assert_eq!(connecting.state, ConnectionState::Connecting);
    assert!(storefront_service::phone_scanned(&state).await.is_err());

    tokio::time::sleep(Duration::from_secs(6)).await;
    let settled = storefront_service::pairing(&state).await?.data.expect("pairing");
    assert_ne!(settled.state, ConnectionState::Connecting);
    assert_eq!(
        state.storefront.read().await.session.phone_connected,
        settled.state == ConnectionState::Connected
    );
    Ok(())
}
