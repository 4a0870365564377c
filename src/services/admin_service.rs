use chrono::NaiveDate;

use crate::{
    dto::admin::{AdminInventory, ChatResponse, DashboardFragment, DashboardResponse, LegacyCharts},
    error::AppResult,
    models::{Ack, Credentials},
    response::{ApiResponse, Meta},
    state::{AdminDashboard, AppState},
    view::{
        analytics::{
            ChartKind, SalesTab, analytics_view, day_of_month, render_category_breakdown,
            render_daily_table, render_kpis, render_summary,
        },
        chat::{CONNECTION_TROUBLE, Sender, render_chat},
        inventory::{ProductFilter, categories, render_admin_table},
    },
};

pub async fn login(state: &AppState, credentials: Credentials) -> AppResult<ApiResponse<Ack>> {
    let ack = state
        .backend
        .admin_login(&credentials)
        .await?
        .accepted("Invalid credentials")?;
    state.admin.write().await.logged_in = true;
    tracing::info!(username = %credentials.username, "admin logged in");
    Ok(ApiResponse::success("Logged in", ack, None))
}

/// Fetches a fresh snapshot for the stored date range. The snapshot replaces
/// the previous one wholesale; the chart is redrawn for the current tab.
pub async fn refresh_analytics(state: &AppState) -> AppResult<bool> {
    let end_date = state.admin.read().await.end_date;
    let ticket = state.sequencers.analytics.issue();
    let snapshot = state.backend.analytics(end_date).await?;

    let mut dashboard = state.admin.write().await;
    let applied = dashboard.snapshot.apply(ticket, snapshot);
    if applied {
        redraw(&mut dashboard);
    }
    Ok(applied)
}

fn redraw(dashboard: &mut AdminDashboard) {
    let tab = dashboard.tab;
    let AdminDashboard {
        snapshot, chart, ..
    } = dashboard;
    if let Some(snapshot) = snapshot.get() {
        chart.draw_series(tab, tab.series(snapshot));
    }
}

fn dashboard_response(dashboard: &AdminDashboard) -> ApiResponse<DashboardResponse> {
    let snapshot = dashboard.snapshot.get().cloned().unwrap_or_default();
    let view = analytics_view(&snapshot, dashboard.tab, dashboard.chart.current());
    ApiResponse::success(
        "Analytics",
        DashboardResponse {
            view,
            end_date: dashboard.end_date,
        },
        Some(Meta::revision(dashboard.snapshot.revision())),
    )
}

pub async fn dashboard(state: &AppState) -> AppResult<ApiResponse<DashboardResponse>> {
    if !state.admin.read().await.snapshot.is_loaded() {
        refresh_analytics(state).await?;
    }
    let dashboard = state.admin.read().await;
    Ok(dashboard_response(&dashboard))
}

/// Re-derives summary and chart from the already-fetched series.
pub async fn select_tab(state: &AppState, tab: SalesTab) -> AppResult<ApiResponse<DashboardResponse>> {
    let mut dashboard = state.admin.write().await;
    dashboard.tab = tab;
    redraw(&mut dashboard);
    Ok(dashboard_response(&dashboard))
}

pub async fn set_date_range(
    state: &AppState,
    end_date: Option<NaiveDate>,
) -> AppResult<ApiResponse<DashboardResponse>> {
    state.admin.write().await.end_date = end_date;
    tracing::info!(?end_date, "analytics date range changed");
    refresh_analytics(state).await?;
    let dashboard = state.admin.read().await;
    Ok(dashboard_response(&dashboard))
}

pub async fn refresh_inventory(state: &AppState) -> AppResult<bool> {
    let ticket = state.sequencers.admin_inventory.issue();
    let products = state.backend.inventory().await?;
    Ok(state.admin.write().await.inventory.apply(ticket, products))
}

pub async fn inventory(
    state: &AppState,
    filter: ProductFilter,
) -> AppResult<ApiResponse<AdminInventory>> {
    if !state.admin.read().await.inventory.is_loaded() {
        refresh_inventory(state).await?;
    }
    let dashboard = state.admin.read().await;
    let products = dashboard.inventory.get().map(Vec::as_slice).unwrap_or_default();
    let rows: Vec<_> = filter.apply(products).into_iter().cloned().collect();
    let meta = Meta::new(rows.len(), products.len(), dashboard.inventory.revision());

    Ok(ApiResponse::success(
        "Inventory",
        AdminInventory {
            html: render_admin_table(&rows)?,
            categories: categories(products),
            rows,
        },
        Some(meta),
    ))
}

/// The two stand-alone charts under the KPI cards.
pub async fn legacy_charts(state: &AppState) -> AppResult<ApiResponse<LegacyCharts>> {
    let daily = state.backend.daily_sales().await?;
    let monthly = state.backend.monthly_sales().await?;

    let mut dashboard = state.admin.write().await;
    let daily_chart = dashboard
        .daily_chart
        .draw(
            "Revenue (₹)",
            ChartKind::Line,
            daily.iter().map(|p| day_of_month(&p.label)).collect(),
            daily.iter().map(|p| p.amount).collect(),
        )
        .clone();
    let monthly_chart = dashboard
        .monthly_chart
        .draw(
            "Sales (₹)",
            ChartKind::Bar,
            monthly.iter().map(|p| p.label.clone()).collect(),
            monthly.iter().map(|p| p.amount).collect(),
        )
        .clone();
    dashboard.legacy_daily = daily.clone();
    dashboard.legacy_monthly = monthly.clone();

    Ok(ApiResponse::success(
        "Charts",
        LegacyCharts {
            daily,
            monthly,
            daily_chart: Some(daily_chart),
            monthly_chart: Some(monthly_chart),
        },
        None,
    ))
}

/// Proxies the assistant. Blank input is ignored; a failed call is answered
/// in the log instead of surfacing an error.
pub async fn chat(state: &AppState, message: &str) -> AppResult<ApiResponse<ChatResponse>> {
    let message = message.trim();
    if message.is_empty() {
        let log = state.admin.read().await.chat.clone();
        return Ok(ApiResponse::success("Ignored", ChatResponse { reply: None, log }, None));
    }

    state.admin.write().await.chat.push(Sender::User, message);
    let reply = match state.backend.chat(message).await {
        Ok(reply) => reply.reply,
        Err(err) => {
            tracing::warn!(error = %err, "chat request failed");
            CONNECTION_TROUBLE.to_string()
        }
    };

    let mut dashboard = state.admin.write().await;
    dashboard.chat.push(Sender::Bot, reply.clone());
    Ok(ApiResponse::success(
        "Chat",
        ChatResponse {
            reply: Some(reply),
            log: dashboard.chat.clone(),
        },
        None,
    ))
}

pub async fn fragment(state: &AppState, part: DashboardFragment) -> AppResult<String> {
    let dashboard = state.admin.read().await;
    let view = || {
        let snapshot = dashboard.snapshot.get().cloned().unwrap_or_default();
        analytics_view(&snapshot, dashboard.tab, dashboard.chart.current())
    };
    let html = match part {
        DashboardFragment::Kpis => render_kpis(&view().kpis),
        DashboardFragment::Summary => {
            let view = view();
            render_summary(view.tab, &view.summary)
        }
        DashboardFragment::DailyTable => render_daily_table(&view().daily_table),
        DashboardFragment::Categories => render_category_breakdown(&view().categories),
        DashboardFragment::Chat => render_chat(&dashboard.chat),
    }?;
    Ok(html)
}
