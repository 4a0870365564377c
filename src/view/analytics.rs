//! Admin analytics: KPI cards, the tabbed revenue chart, the daily table and
//! the category breakdown.
//!
//! Everything here reads the [`AnalyticsSnapshot`] by shared reference.
//! Switching tabs derives new labels, values and a new chart instance from
//! the already-fetched series and never touches the series themselves.

use askama::Template;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{AnalyticsSnapshot, CategorySale, SalesStats, SeriesPoint},
    money::{format_inr, format_percent},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SalesTab {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl SalesTab {
    pub const ALL: [SalesTab; 4] = [
        SalesTab::Hourly,
        SalesTab::Daily,
        SalesTab::Weekly,
        SalesTab::Monthly,
    ];

    pub fn series(self, snapshot: &AnalyticsSnapshot) -> &[SeriesPoint] {
        match self {
            SalesTab::Hourly => &snapshot.hourly_sales,
            SalesTab::Daily => &snapshot.daily_sales,
            SalesTab::Weekly => &snapshot.weekly_sales,
            SalesTab::Monthly => &snapshot.monthly_sales,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SalesTab::Hourly => "Hourly Revenue",
            SalesTab::Daily => "Daily Revenue",
            SalesTab::Weekly => "Weekly Revenue",
            SalesTab::Monthly => "Monthly Revenue",
        }
    }

    /// Hourly and daily read as trends, the longer buckets as bars.
    pub fn chart_kind(self) -> ChartKind {
        match self {
            SalesTab::Hourly | SalesTab::Daily => ChartKind::Line,
            SalesTab::Weekly | SalesTab::Monthly => ChartKind::Bar,
        }
    }

    fn label(self, raw: &str) -> String {
        match self {
            SalesTab::Hourly => match raw.parse::<u32>() {
                Ok(hour) if hour < 24 => format!("{hour:02}:00"),
                _ => raw.to_string(),
            },
            SalesTab::Daily => day_of_month(raw),
            SalesTab::Weekly | SalesTab::Monthly => raw.to_string(),
        }
    }
}

/// `2024-01-05` → `05`; anything else is left alone.
pub fn day_of_month(date: &str) -> String {
    let mut parts = date.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(_), Some(day), None) => day.to_string(),
        _ => date.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SeriesSummary {
    pub total: Decimal,
    pub average: Decimal,
    pub peak: Decimal,
    pub peak_label: Option<String>,
}

/// Zero for every figure when the series is empty.
pub fn summarize(series: &[SeriesPoint]) -> SeriesSummary {
    let total: Decimal = series.iter().map(|p| p.amount).sum();
    let average = if series.is_empty() {
        Decimal::ZERO
    } else {
        (total / Decimal::from(series.len())).round_dp(2)
    };
    // First maximum wins on ties.
    let peak = series
        .iter()
        .fold(None::<&SeriesPoint>, |best, p| match best {
            Some(b) if b.amount >= p.amount => Some(b),
            _ => Some(p),
        });

    SeriesSummary {
        total,
        average,
        peak: peak.map(|p| p.amount).unwrap_or(Decimal::ZERO),
        peak_label: peak.map(|p| p.label.clone()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartInstance {
    pub id: u64,
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

/// One canvas, at most one live chart on it.
#[derive(Debug, Clone, Default)]
pub struct ChartCanvas {
    current: Option<ChartInstance>,
    created: u64,
    destroyed: u64,
}

impl ChartCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroys the live instance, if any, then draws a new one.
    pub fn draw(&mut self, title: &str, kind: ChartKind, labels: Vec<String>, values: Vec<Decimal>) -> &ChartInstance {
        if self.current.take().is_some() {
            self.destroyed += 1;
        }
        self.created += 1;
        self.current.insert(ChartInstance {
            id: self.created,
            kind,
            title: title.to_string(),
            labels,
            values,
        })
    }

    pub fn draw_series(&mut self, tab: SalesTab, series: &[SeriesPoint]) -> &ChartInstance {
        let labels = series.iter().map(|p| tab.label(&p.label)).collect();
        let values = series.iter().map(|p| p.amount).collect();
        self.draw(tab.title(), tab.chart_kind(), labels, values)
    }

    pub fn current(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    pub fn live_instances(&self) -> u64 {
        self.created - self.destroyed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyRow {
    pub label: String,
    pub amount: Decimal,
    /// `None` on the first row.
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyTable {
    pub rows: Vec<DailyRow>,
    pub total: Decimal,
}

/// Rows in input order; `↑` when a day is at least the previous one.
pub fn daily_table(series: &[SeriesPoint]) -> DailyTable {
    let rows = series
        .iter()
        .enumerate()
        .map(|(i, point)| DailyRow {
            label: point.label.clone(),
            amount: point.amount,
            trend: i.checked_sub(1).map(|prev| {
                if point.amount >= series[prev].amount {
                    Trend::Up
                } else {
                    Trend::Down
                }
            }),
        })
        .collect();

    DailyTable {
        rows,
        total: series.iter().map(|p| p.amount).sum(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Percent of all category sales, one decimal place.
    pub share: Decimal,
}

pub fn category_breakdown(sales: &[CategorySale]) -> Vec<CategoryShare> {
    let total: Decimal = sales.iter().map(|s| s.amount).sum();
    let mut shares: Vec<CategoryShare> = sales
        .iter()
        .map(|s| CategoryShare {
            category: s.category.clone(),
            amount: s.amount,
            share: if total.is_zero() {
                Decimal::ZERO
            } else {
                (s.amount * Decimal::ONE_HUNDRED / total).round_dp(1)
            },
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct KpiCard {
    pub key: String,
    pub label: String,
    pub value: String,
    pub trend: Option<Decimal>,
}

pub fn kpi_cards(stats: &SalesStats) -> Vec<KpiCard> {
    vec![
        KpiCard {
            key: "sales".into(),
            label: "Total Sales".into(),
            value: format_inr(stats.total_sales),
            trend: stats.sales_trend,
        },
        KpiCard {
            key: "orders".into(),
            label: "Total Orders".into(),
            value: stats.total_orders.to_string(),
            trend: stats.orders_trend,
        },
        KpiCard {
            key: "inventory".into(),
            label: "Products".into(),
            value: stats.total_products.to_string(),
            trend: None,
        },
        KpiCard {
            key: "low-stock".into(),
            label: "Low Stock".into(),
            value: stats.low_stock_count.to_string(),
            trend: None,
        },
    ]
}

/// What the dashboard renders for the selected tab.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnalyticsView {
    pub tab: SalesTab,
    pub kpis: Vec<KpiCard>,
    pub summary: SeriesSummary,
    pub chart: Option<ChartInstance>,
    pub daily_table: DailyTable,
    pub categories: Vec<CategoryShare>,
    pub recent_sales: Vec<crate::models::RecentSale>,
}

pub fn analytics_view(
    snapshot: &AnalyticsSnapshot,
    tab: SalesTab,
    chart: Option<&ChartInstance>,
) -> AnalyticsView {
    AnalyticsView {
        tab,
        kpis: kpi_cards(&snapshot.stats),
        summary: summarize(tab.series(snapshot)),
        chart: chart.cloned(),
        daily_table: daily_table(&snapshot.daily_sales),
        categories: category_breakdown(&snapshot.category_sales),
        recent_sales: snapshot.recent_sales.clone(),
    }
}

struct KpiRow<'a> {
    key: &'a str,
    label: &'a str,
    value: &'a str,
    /// Empty for cards without a trend.
    trend: String,
    trend_class: &'static str,
}

#[derive(Template)]
#[template(path = "kpis.html")]
struct KpiTemplate<'a> {
    cards: Vec<KpiRow<'a>>,
}

pub fn render_kpis(cards: &[KpiCard]) -> askama::Result<String> {
    let cards = cards
        .iter()
        .map(|card| {
            let (trend, trend_class) = match card.trend {
                Some(t) if t >= Decimal::ZERO => (
                    format!("{} {}", Trend::Up.arrow(), format_percent(t.abs())),
                    "trend text-green-500",
                ),
                Some(t) => (
                    format!("{} {}", Trend::Down.arrow(), format_percent(t.abs())),
                    "trend text-red-500",
                ),
                None => (String::new(), ""),
            };
            KpiRow {
                key: &card.key,
                label: &card.label,
                value: &card.value,
                trend,
                trend_class,
            }
        })
        .collect();
    KpiTemplate { cards }.render()
}

#[derive(Template)]
#[template(path = "chart_summary.html")]
struct SummaryTemplate {
    tab: &'static str,
    average: String,
    peak: String,
    total: String,
}

pub fn render_summary(tab: SalesTab, summary: &SeriesSummary) -> askama::Result<String> {
    SummaryTemplate {
        tab: tab_code(tab),
        average: format_inr(summary.average),
        peak: format_inr(summary.peak),
        total: format_inr(summary.total),
    }
    .render()
}

fn tab_code(tab: SalesTab) -> &'static str {
    match tab {
        SalesTab::Hourly => "hourly",
        SalesTab::Daily => "daily",
        SalesTab::Weekly => "weekly",
        SalesTab::Monthly => "monthly",
    }
}

struct DailyTableRow<'a> {
    label: &'a str,
    amount: String,
    /// Empty on the first row.
    arrow: &'static str,
    class: &'static str,
}

#[derive(Template)]
#[template(path = "daily_table.html")]
struct DailyTableTemplate<'a> {
    rows: Vec<DailyTableRow<'a>>,
    total: String,
}

pub fn render_daily_table(table: &DailyTable) -> askama::Result<String> {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let (arrow, class) = match row.trend {
                Some(Trend::Up) => (Trend::Up.arrow(), "text-green-500"),
                Some(Trend::Down) => (Trend::Down.arrow(), "text-red-500"),
                None => ("", ""),
            };
            DailyTableRow {
                label: &row.label,
                amount: format_inr(row.amount),
                arrow,
                class,
            }
        })
        .collect();
    DailyTableTemplate {
        rows,
        total: format_inr(table.total),
    }
    .render()
}

struct ShareRow<'a> {
    category: &'a str,
    amount: String,
    share: String,
    width: String,
}

#[derive(Template)]
#[template(path = "category_breakdown.html")]
struct CategoryTemplate<'a> {
    shares: Vec<ShareRow<'a>>,
}

pub fn render_category_breakdown(shares: &[CategoryShare]) -> askama::Result<String> {
    let shares = shares
        .iter()
        .map(|share| ShareRow {
            category: &share.category,
            amount: format_inr(share.amount),
            share: format_percent(share.share),
            width: share.share.normalize().to_string(),
        })
        .collect();
    CategoryTemplate { shares }.render()
}
