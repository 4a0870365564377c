use std::time::Instant;

use chrono::Utc;

use crate::{
    backend::BackendError,
    dto::worker::{
        AddProductRequest, ConsoleFragment, ConsoleState, EditProductForm, PanelPhases,
        PromotionPool, SettingsRequest, SpinWheelRequest, WorkerInventory,
    },
    error::{AppError, AppResult},
    models::{Ack, Credentials, UiSettings},
    response::{ApiResponse, Meta},
    state::{AppState, StockTab, WorkerConsole, WorkerMode, WorkerPanel},
    ui::session::Theme,
    view::{
        chat::{ChatLog, Sender, render_chat, worker_reply},
        design::{render_canvas, render_graphics, render_templates},
        inventory::{ProductFilter, inventory_view, render_worker_table},
        promotions::{
            promotion_entries, render_promotion_list, rotation_countdown, spin_wheel_promotion,
        },
    },
};

pub const WORKER_SESSION_EXPIRED: &str = "Your worker session expired. Please login again.";

/// A 401 ends the worker session.
pub(crate) async fn backend_failure(state: &AppState, err: BackendError) -> AppError {
    if matches!(err, BackendError::Unauthorized) {
        state.worker.write().await.logged_in = false;
        tracing::warn!("worker session expired");
        return AppError::Unauthorized(WORKER_SESSION_EXPIRED.to_string());
    }
    err.into()
}

async fn accepted(state: &AppState, result: Result<Ack, BackendError>, fallback: &str) -> AppResult<Ack> {
    match result.and_then(|ack| ack.accepted(fallback)) {
        Ok(ack) => Ok(ack),
        Err(err) => Err(backend_failure(state, err).await),
    }
}

pub async fn login(state: &AppState, credentials: Credentials) -> AppResult<ApiResponse<Ack>> {
    let ack = accepted(
        state,
        state.backend.worker_login(&credentials).await,
        "Invalid credentials",
    )
    .await?;
    state.worker.write().await.logged_in = true;
    tracing::info!(username = %credentials.username, "worker logged in");
    Ok(ApiResponse::success("Logged in", ack, None))
}

pub async fn logout(state: &AppState) -> AppResult<ApiResponse<Ack>> {
    let ack = accepted(state, state.backend.worker_logout().await, "Logout failed").await?;
    *state.worker.write().await = WorkerConsole::default();
    Ok(ApiResponse::success("Logged out", ack, None))
}

/// `GET /api/worker/products`, applied through the worker sequencer.
pub async fn fetch_products(state: &AppState) -> AppResult<bool> {
    let ticket = state.sequencers.worker_products.issue();
    let products = match state.backend.worker_products().await {
        Ok(products) => products,
        Err(err) => return Err(backend_failure(state, err).await),
    };
    Ok(state.worker.write().await.products.apply(ticket, products))
}

pub async fn inventory(
    state: &AppState,
    filter: &ProductFilter,
) -> AppResult<ApiResponse<WorkerInventory>> {
    if !state.worker.read().await.products.is_loaded() {
        fetch_products(state).await?;
    }
    let console = state.worker.read().await;
    let products = console.products.get().map(Vec::as_slice).unwrap_or_default();
    let view = inventory_view(products, filter);
    let meta = Meta::new(view.rows.len(), products.len(), console.products.revision());

    Ok(ApiResponse::success(
        "Inventory",
        WorkerInventory {
            html: render_worker_table(&view.rows)?,
            stats: view.stats,
            categories: view.categories,
            rows: view.rows,
        },
        Some(meta),
    ))
}

pub async fn add_product(
    state: &AppState,
    request: AddProductRequest,
) -> AppResult<ApiResponse<WorkerInventory>> {
    let product = request.validate()?;
    accepted(
        state,
        state.backend.add_product(&product).await,
        "Failed to add product.",
    )
    .await?;
    tracing::info!(id = %product.id, "product added");

    fetch_products(state).await?;
    state.worker.write().await.tab = StockTab::Inventory;
    let mut response = inventory(state, &ProductFilter::default()).await?;
    response.message = "Product added successfully!".into();
    Ok(response)
}

pub async fn open_edit(state: &AppState, id: &str) -> AppResult<ApiResponse<EditProductForm>> {
    let mut console = state.worker.write().await;
    let row = console
        .products
        .get()
        .and_then(|products| products.iter().find(|p| p.id == id))
        .cloned()
        .ok_or(AppError::NotFound)?;

    let form = EditProductForm::prefill(&row);
    console.editing = Some(row);
    console.modals.edit.open(Instant::now());
    Ok(ApiResponse::success("Edit", form, None))
}

/// Sends the changed fields only. Nothing changed closes the modal without
/// a backend call.
pub async fn save_edit(
    state: &AppState,
    form: EditProductForm,
) -> AppResult<ApiResponse<WorkerInventory>> {
    let row = {
        let console = state.worker.read().await;
        console
            .editing
            .clone()
            .filter(|row| row.id == form.id)
            .or_else(|| {
                console
                    .products
                    .get()
                    .and_then(|products| products.iter().find(|p| p.id == form.id))
                    .cloned()
            })
            .ok_or(AppError::NotFound)?
    };

    let patch = form.into_patch(&row)?;
    if patch.has_changes() {
        accepted(
            state,
            state.backend.update_product(&patch).await,
            "Failed to save changes.",
        )
        .await?;
        tracing::info!(id = %patch.id, "product updated");
    }

    {
        let mut console = state.worker.write().await;
        console.editing = None;
        console.modals.edit.close(Instant::now());
    }
    if patch.has_changes() {
        fetch_products(state).await?;
    }
    inventory(state, &ProductFilter::default()).await
}

pub async fn delete_product(state: &AppState, id: &str) -> AppResult<ApiResponse<WorkerInventory>> {
    accepted(
        state,
        state.backend.delete_product(id).await,
        "Failed to delete product.",
    )
    .await?;
    tracing::info!(id, "product deleted");

    fetch_products(state).await?;
    inventory(state, &ProductFilter::default()).await
}

pub async fn load_settings(state: &AppState) -> AppResult<ApiResponse<UiSettings>> {
    let settings = match state.backend.settings().await {
        Ok(settings) => settings,
        Err(err) => return Err(backend_failure(state, err).await),
    };
    state.worker.write().await.settings = Some(settings.clone());
    Ok(ApiResponse::success("Settings", settings, None))
}

pub async fn save_settings(
    state: &AppState,
    request: SettingsRequest,
) -> AppResult<ApiResponse<UiSettings>> {
    let settings = request.validate()?;
    accepted(
        state,
        state.backend.save_settings(&settings).await,
        "Failed to save settings.",
    )
    .await?;
    state.worker.write().await.settings = Some(settings.clone());
    Ok(ApiResponse::success(
        "Settings saved! Customer UI will update shortly.",
        settings,
        None,
    ))
}

fn console_state(console: &mut WorkerConsole) -> ConsoleState {
    let modals = &mut console.modals;
    modals.tick(Instant::now());
    ConsoleState {
        mode: console.mode,
        tab: console.tab,
        theme: console.theme,
        logged_in: console.logged_in,
        editing: console.editing.as_ref().map(EditProductForm::prefill),
        canvas: console.canvas.clone(),
        panels: PanelPhases {
            edit: modals.edit.phase(),
            tools: modals.tools.phase(),
            ai: modals.ai.phase(),
            promotions: modals.promotions.phase(),
            spin_creator: modals.spin_creator.phase(),
        },
        next_rotation: modals
            .rotation_timer_running()
            .then(|| rotation_countdown(Utc::now())),
    }
}

pub async fn state_of(state: &AppState) -> AppResult<ApiResponse<ConsoleState>> {
    let mut console = state.worker.write().await;
    Ok(ApiResponse::success("Console", console_state(&mut console), None))
}

pub async fn set_mode(state: &AppState, mode: WorkerMode) -> AppResult<ApiResponse<ConsoleState>> {
    let mut console = state.worker.write().await;
    console.mode = mode;
    Ok(ApiResponse::success("Mode", console_state(&mut console), None))
}

/// The editor opens from a product row and the promotions manager always
/// refetches its list, so both go through their own operations.
pub async fn open_panel(state: &AppState, panel: WorkerPanel) -> AppResult<ApiResponse<ConsoleState>> {
    match panel {
        WorkerPanel::Edit => {
            return Err(AppError::BadRequest("Choose a product to edit.".to_string()));
        }
        WorkerPanel::Promotions => {
            promotions(state).await?;
        }
        other => {
            state.worker.write().await.modals.panel_mut(other).open(Instant::now());
        }
    }
    state_of(state).await
}

pub async fn close_panel(state: &AppState, panel: WorkerPanel) -> AppResult<ApiResponse<ConsoleState>> {
    let mut console = state.worker.write().await;
    console.modals.panel_mut(panel).close(Instant::now());
    match panel {
        WorkerPanel::Edit => console.editing = None,
        WorkerPanel::Promotions => tracing::debug!("rotation timer stopped"),
        _ => {}
    }
    Ok(ApiResponse::success("Closed", console_state(&mut console), None))
}

/// The settings tab loads the current settings when opened.
pub async fn set_tab(state: &AppState, tab: StockTab) -> AppResult<ApiResponse<ConsoleState>> {
    state.worker.write().await.tab = tab;
    if tab == StockTab::Settings {
        load_settings(state).await?;
    }
    state_of(state).await
}

/// `None` toggles.
pub async fn set_theme(state: &AppState, theme: Option<Theme>) -> AppResult<ApiResponse<ConsoleState>> {
    let mut console = state.worker.write().await;
    let next = theme.unwrap_or_else(|| console.theme.toggled());
    console.theme = next;
    Ok(ApiResponse::success("Theme", console_state(&mut console), None))
}

pub async fn fetch_promotions(state: &AppState) -> AppResult<bool> {
    let ticket = state.sequencers.worker_promotions.issue();
    let promotions = match state.backend.promotions().await {
        Ok(promotions) => promotions,
        Err(err) => return Err(backend_failure(state, err).await),
    };
    Ok(state.worker.write().await.promotions.apply(ticket, promotions))
}

async fn promotion_pool(state: &AppState) -> AppResult<ApiResponse<PromotionPool>> {
    let console = state.worker.read().await;
    let entries = promotion_entries(console.promotions.get().map(Vec::as_slice).unwrap_or_default());
    let meta = Meta::new(entries.len(), entries.len(), console.promotions.revision());
    Ok(ApiResponse::success(
        "Promotions",
        PromotionPool {
            html: render_promotion_list(&entries)?,
            next_rotation: rotation_countdown(Utc::now()),
            entries,
        },
        Some(meta),
    ))
}

/// Opens the manager: the list is fetched fresh every time.
pub async fn promotions(state: &AppState) -> AppResult<ApiResponse<PromotionPool>> {
    fetch_promotions(state).await?;
    state
        .worker
        .write()
        .await
        .modals
        .promotions
        .open(Instant::now());
    tracing::debug!("rotation timer started");
    promotion_pool(state).await
}

pub async fn delete_promotion(state: &AppState, id: i64) -> AppResult<ApiResponse<PromotionPool>> {
    accepted(state, state.backend.delete_promotion(id).await, "Delete failed").await?;
    tracing::info!(id, "promotion deleted");
    fetch_promotions(state).await?;
    promotion_pool(state).await
}

pub async fn deploy_spin_wheel(
    state: &AppState,
    request: SpinWheelRequest,
) -> AppResult<ApiResponse<Ack>> {
    let promotion = spin_wheel_promotion(&request.title, &request.prizes)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let ack = accepted(
        state,
        state.backend.add_promotion(&promotion).await,
        "Error launching",
    )
    .await?;
    state
        .worker
        .write()
        .await
        .modals
        .spin_creator
        .close(Instant::now());
    tracing::info!(title = %promotion.title, prizes = promotion.content.prizes.len(), "spin wheel launched");
    Ok(ApiResponse::success("Spin Wheel Launched! 🎡", ack, None))
}

/// Answered locally from the loaded product list.
pub async fn chat(state: &AppState, message: &str) -> AppResult<ApiResponse<ChatLog>> {
    let message = message.trim();
    let mut console = state.worker.write().await;
    if !message.is_empty() {
        let reply = {
            let products = console.products.get().map(Vec::as_slice).unwrap_or_default();
            worker_reply(message, products)
        };
        console.chat.push(Sender::User, message);
        console.chat.push(Sender::Bot, reply);
    }
    Ok(ApiResponse::success("Chat", console.chat.clone(), None))
}

pub async fn fragment(state: &AppState, part: ConsoleFragment) -> AppResult<String> {
    let console = state.worker.read().await;
    let html = match part {
        ConsoleFragment::Canvas => render_canvas(&console.canvas),
        ConsoleFragment::Templates => render_templates(),
        ConsoleFragment::Graphics => render_graphics(),
        ConsoleFragment::Chat => render_chat(&console.chat),
    }?;
    Ok(html)
}
