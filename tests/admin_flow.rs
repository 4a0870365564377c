mod common;

use std::sync::{Arc, atomic::Ordering};

use chrono::NaiveDate;
use common::{MockBackend, d, product, state_with};
use trolley_console::{
    dto::admin::DashboardFragment,
    models::{AnalyticsSnapshot, CategorySale, Credentials, SalesStats, SeriesPoint},
    services::admin_service,
    view::{
        analytics::{SalesTab, Trend},
        chat::CONNECTION_TROUBLE,
        inventory::{ProductFilter, StockFilter},
    },
};

fn snapshot() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        stats: SalesStats {
            total_sales: d("1200"),
            total_orders: 8,
            total_products: 40,
            low_stock_count: 2,
            sales_trend: Some(d("-4.5")),
            orders_trend: None,
        },
        hourly_sales: vec![SeriesPoint::new("9", d("50")), SeriesPoint::new("10", d("150"))],
        daily_sales: vec![
            SeriesPoint::new("2024-01-01", d("100")),
            SeriesPoint::new("2024-01-02", d("200")),
        ],
        weekly_sales: vec![],
        monthly_sales: vec![SeriesPoint::new("Jan", d("68000"))],
        category_sales: vec![
            CategorySale {
                category: "Dairy".into(),
                amount: d("100"),
            },
            CategorySale {
                category: "Grains".into(),
                amount: d("300"),
            },
        ],
        ..Default::default()
    }
}

fn backend() -> Arc<MockBackend> {
    let backend = MockBackend::default();
    *backend.analytics.lock().unwrap() = snapshot();
    *backend.inventory.lock().unwrap() = vec![
        product("52612D5C", "Rice Bag 5kg", "320", 50, "Grains"),
        product("A1B2C3D4", "Milk 1L", "60", 8, "Dairy"),
    ];
    Arc::new(backend)
}

#[tokio::test]
async fn dashboard_renders_daily_table_and_breakdown() -> anyhow::Result<()> {
    let state = state_with(backend());

    let view = admin_service::dashboard(&state).await?.data.expect("dashboard").view;

    assert_eq!(view.tab, SalesTab::Daily);
    assert_eq!(view.daily_table.rows[0].trend, None);
    assert_eq!(view.daily_table.rows[1].trend, Some(Trend::Up));
    assert_eq!(view.daily_table.total, d("300"));
    assert_eq!(view.summary.total, d("300"));
    assert_eq!(view.summary.average, d("150"));
    assert_eq!(view.categories[0].category, "Grains");
    assert_eq!(view.categories[0].share, d("75"));
    assert_eq!(view.chart.expect("chart").labels, vec!["01", "02"]);

    let kpis = admin_service::fragment(&state, DashboardFragment::Kpis).await?;
    assert!(kpis.contains("stat-low-stock"));
    Ok(())
}

#[tokio::test]
async fn switching_tabs_redraws_one_chart_without_touching_series() -> anyhow::Result<()> {
    let state = state_with(backend());
    admin_service::dashboard(&state).await?;

    for tab in [SalesTab::Hourly, SalesTab::Monthly, SalesTab::Weekly, SalesTab::Daily] {
        admin_service::select_tab(&state, tab).await?;
    }
    let hourly = admin_service::select_tab(&state, SalesTab::Hourly)
        .await?
        .data
        .expect("dashboard")
        .view;

    assert_eq!(hourly.summary.peak, d("150"));
    assert_eq!(hourly.summary.peak_label.as_deref(), Some("10"));
    assert_eq!(hourly.chart.expect("chart").labels, vec!["09:00", "10:00"]);
    let dashboard = state.admin.read().await;
    assert_eq!(dashboard.chart.live_instances(), 1);
    assert_eq!(dashboard.snapshot.get(), Some(&snapshot()));
    Ok(())
}

#[tokio::test]
async fn empty_series_summarises_to_zero() -> anyhow::Result<()> {
    let state = state_with(backend());
    admin_service::dashboard(&state).await?;

    let weekly = admin_service::select_tab(&state, SalesTab::Weekly)
        .await?
        .data
        .expect("dashboard")
        .view;
    assert_eq!(weekly.summary.total, d("0"));
    assert_eq!(weekly.summary.average, d("0"));
    assert_eq!(weekly.summary.peak_label, None);
    Ok(())
}

#[tokio::test]
async fn date_range_refetches_with_end_date() -> anyhow::Result<()> {
    let backend = backend();
    let state = state_with(backend.clone());
    admin_service::dashboard(&state).await?;

    let end = NaiveDate::from_ymd_opt(2024, 1, 31).expect("date");
    let resp = admin_service::set_date_range(&state, Some(end)).await?;

    assert_eq!(resp.data.expect("dashboard").end_date, Some(end));
    assert_eq!(MockBackend::count(&backend.analytics_calls), 2);
    assert_eq!(*backend.analytics_dates.lock().unwrap(), vec![None, Some(end)]);
    Ok(())
}

#[tokio::test]
async fn inventory_marks_low_stock_below_ten() -> anyhow::Result<()> {
    let state = state_with(backend());

    let all = admin_service::inventory(&state, ProductFilter::default())
        .await?
        .data
        .expect("inventory");
    assert_eq!(all.categories, vec!["Dairy", "Grains"]);
    assert!(all.html.contains("Low Stock"));
    assert!(all.html.contains("In Stock"));

    let dairy = ProductFilter::new(None, Some("Dairy"), StockFilter::All);
    let dairy = admin_service::inventory(&state, dairy).await?.data.expect("inventory");
    assert_eq!(dairy.rows.len(), 1);
    Ok(())
}

#[tokio::test]
async fn legacy_charts_label_days_by_day_of_month() -> anyhow::Result<()> {
    let state = state_with(backend());

    let charts = admin_service::legacy_charts(&state).await?.data.expect("charts");
    assert_eq!(charts.daily_chart.expect("daily").labels, vec!["01", "02"]);
    assert_eq!(charts.monthly_chart.expect("monthly").labels, vec!["2024-03"]);

    admin_service::legacy_charts(&state).await?;
    let dashboard = state.admin.read().await;
    assert_eq!(dashboard.daily_chart.live_instances(), 1);
    assert_eq!(dashboard.monthly_chart.live_instances(), 1);
    Ok(())
}

#[tokio::test]
async fn chat_ignores_blank_input_and_survives_failures() -> anyhow::Result<()> {
    let backend = backend();
    let state = state_with(backend.clone());

    let ignored = admin_service::chat(&state, "   ").await?.data.expect("chat");
    assert_eq!(ignored.reply, None);
    assert!(ignored.log.messages.is_empty());

    let answered = admin_service::chat(&state, "sales today?").await?.data.expect("chat");
    assert_eq!(answered.reply.as_deref(), Some("You said: sales today?"));

    backend.chat_fails.store(true, Ordering::SeqCst);
    let failed = admin_service::chat(&state, "again").await?.data.expect("chat");
    assert_eq!(failed.reply.as_deref(), Some(CONNECTION_TROUBLE));
    assert_eq!(failed.log.messages.len(), 4);
    Ok(())
}

#[tokio::test]
async fn admin_login_rejects_bad_password() {
    let state = state_with(backend());
    let err = admin_service::login(
        &state,
        Credentials {
            username: "admin".into(),
            password: "wrong".into(),
        },
    )
    .await
    .expect_err("bad password");
    assert_eq!(err.user_message(), "Invalid credentials");
}
