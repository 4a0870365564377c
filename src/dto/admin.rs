use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Product, SeriesPoint},
    view::{
        analytics::{AnalyticsView, ChartInstance},
        chat::ChatLog,
    },
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateRangeRequest {
    /// Last day of the reporting window; `null` resets to today.
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: Option<String>,
    pub log: ChatLog,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub view: AnalyticsView,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminInventory {
    pub rows: Vec<Product>,
    pub categories: Vec<String>,
    pub html: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LegacyCharts {
    pub daily: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
    pub daily_chart: Option<ChartInstance>,
    pub monthly_chart: Option<ChartInstance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardFragment {
    Kpis,
    Summary,
    DailyTable,
    Categories,
    Chat,
}
