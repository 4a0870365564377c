//! Shared application state.
//!
//! Each console owns one explicit state object behind its own lock. Render
//! functions take these by reference; services mutate them after a backend
//! call resolves. Sequencers live outside the locks so a ticket can be taken
//! before the request is sent.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use chrono::NaiveDate;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    backend::TrolleyBackend,
    config::AppConfig,
    models::{
        AnalyticsSnapshot, Cart, OrderSummary, Product, Promotion, SeriesPoint, UiSettings,
    },
    polling::{Sequenced, Sequencer},
    spin::{SpinOutcome, SpinWheel},
    ui::{
        modal::{Modal, ModalPhase},
        pairing::PairingSession,
        session::{Preferences, SessionFlags, Theme},
    },
    view::{analytics::{ChartCanvas, SalesTab}, chat::ChatLog, design::DesignCanvas},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn TrolleyBackend>,
    pub storefront: Arc<RwLock<StorefrontView>>,
    pub admin: Arc<RwLock<AdminDashboard>>,
    pub worker: Arc<RwLock<WorkerConsole>>,
    pub sequencers: Arc<Sequencers>,
    pub shutdown: CancellationToken,
    rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn TrolleyBackend>) -> Self {
        Self::with_rng(config, backend, StdRng::from_entropy())
    }

    /// Deterministic spins and pairing tokens for tests.
    pub fn with_rng(config: AppConfig, backend: Arc<dyn TrolleyBackend>, rng: StdRng) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            storefront: Arc::new(RwLock::new(StorefrontView::default())),
            admin: Arc::new(RwLock::new(AdminDashboard::default())),
            worker: Arc::new(RwLock::new(WorkerConsole::default())),
            sequencers: Arc::new(Sequencers::default()),
            shutdown: CancellationToken::new(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Never held across an `.await`.
    pub fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One sequencer per independently polled resource.
#[derive(Debug, Default)]
pub struct Sequencers {
    pub cart: Sequencer,
    pub catalog: Sequencer,
    pub analytics: Sequencer,
    pub admin_inventory: Sequencer,
    pub worker_products: Sequencer,
    pub worker_promotions: Sequencer,
}

#[derive(Debug, Default)]
pub struct StorefrontModals {
    pub promotion: Modal,
    pub spin: Modal,
    pub payment: Modal,
    pub success: Modal,
    pub pairing: Modal,
}

/// Customer trolley screen.
#[derive(Debug, Default)]
pub struct StorefrontView {
    pub cart: Sequenced<Cart>,
    pub catalog: Sequenced<Vec<Product>>,
    pub settings: Option<UiSettings>,
    pub preferences: Preferences,
    pub session: SessionFlags,
    /// Id of the banner most recently shown, to show each banner once.
    pub last_banner_id: Option<i64>,
    pub banner: Option<Promotion>,
    pub wheel: Option<SpinWheel>,
    pub last_spin: Option<SpinOutcome>,
    pub receipt: Option<OrderSummary>,
    pub pairing: PairingSession,
    pub modals: StorefrontModals,
    /// Last error surfaced as a non-blocking banner.
    pub notice: Option<String>,
}

#[derive(Debug, Default)]
pub struct AdminDashboard {
    pub snapshot: Sequenced<AnalyticsSnapshot>,
    pub tab: SalesTab,
    pub end_date: Option<NaiveDate>,
    pub chart: ChartCanvas,
    pub inventory: Sequenced<Vec<Product>>,
    pub daily_chart: ChartCanvas,
    pub monthly_chart: ChartCanvas,
    pub legacy_daily: Vec<SeriesPoint>,
    pub legacy_monthly: Vec<SeriesPoint>,
    pub chat: ChatLog,
    pub logged_in: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkerMode {
    #[default]
    Stock,
    Design,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StockTab {
    #[default]
    Inventory,
    AddProduct,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerPanel {
    Edit,
    Tools,
    Ai,
    Promotions,
    SpinCreator,
}

#[derive(Debug, Default)]
pub struct WorkerModals {
    pub edit: Modal,
    pub tools: Modal,
    pub ai: Modal,
    pub promotions: Modal,
    pub spin_creator: Modal,
}

impl WorkerModals {
    pub fn panel_mut(&mut self, panel: WorkerPanel) -> &mut Modal {
        match panel {
            WorkerPanel::Edit => &mut self.edit,
            WorkerPanel::Tools => &mut self.tools,
            WorkerPanel::Ai => &mut self.ai,
            WorkerPanel::Promotions => &mut self.promotions,
            WorkerPanel::SpinCreator => &mut self.spin_creator,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        for modal in [
            &mut self.edit,
            &mut self.tools,
            &mut self.ai,
            &mut self.promotions,
            &mut self.spin_creator,
        ] {
            modal.tick(now);
        }
    }

    /// The rotation countdown runs only while the manager is up.
    pub fn rotation_timer_running(&self) -> bool {
        matches!(self.promotions.phase(), ModalPhase::Opening | ModalPhase::Open)
    }
}

/// Staff console: inventory, settings and design mode.
#[derive(Debug, Default)]
pub struct WorkerConsole {
    pub products: Sequenced<Vec<Product>>,
    pub promotions: Sequenced<Vec<Promotion>>,
    pub settings: Option<UiSettings>,
    pub mode: WorkerMode,
    pub tab: StockTab,
    pub theme: Theme,
    /// Row the edit modal was opened from.
    pub editing: Option<Product>,
    pub canvas: DesignCanvas,
    pub modals: WorkerModals,
    pub chat: ChatLog,
    pub logged_in: bool,
}
