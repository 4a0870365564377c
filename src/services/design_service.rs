use std::time::Instant;

use crate::{
    backend::BackendError,
    dto::worker::DesignOutcome,
    error::{AppError, AppResult},
    models::Ack,
    response::ApiResponse,
    services::worker_service::backend_failure,
    state::AppState,
    view::design::{DesignCanvas, TEMPLATES, image_candidates},
};

const GENERATE_FAILED: &str = "Failed to generate design.";
const NO_IMAGE: &str = "Design generated, but no background image could be loaded.";
const FALLBACK_NOTE: &str =
    "Design generated. The original background failed to load, so a fallback image was applied.";
const GENERATED: &str = "Design generated successfully.";

pub async fn canvas(state: &AppState) -> AppResult<ApiResponse<DesignCanvas>> {
    let console = state.worker.read().await;
    Ok(ApiResponse::success("Canvas", console.canvas.clone(), None))
}

/// Live preview: the canvas mirrors the editor fields.
pub async fn update_canvas(
    state: &AppState,
    canvas: DesignCanvas,
) -> AppResult<ApiResponse<DesignCanvas>> {
    let mut console = state.worker.write().await;
    console.canvas = canvas;
    Ok(ApiResponse::success("Canvas", console.canvas.clone(), None))
}

pub async fn apply_template(state: &AppState, index: usize) -> AppResult<ApiResponse<DesignCanvas>> {
    let template = TEMPLATES
        .get(index)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown template {index}")))?;
    let mut console = state.worker.write().await;
    console.canvas.apply_template(template);
    console.modals.tools.close(Instant::now());
    Ok(ApiResponse::success("Template applied", console.canvas.clone(), None))
}

pub async fn apply_graphic(state: &AppState, url: &str) -> AppResult<ApiResponse<DesignCanvas>> {
    if url.trim().is_empty() {
        return Err(AppError::BadRequest("Image URL is required".into()));
    }
    let mut console = state.worker.write().await;
    console.canvas.apply_graphic(url);
    console.modals.tools.close(Instant::now());
    Ok(ApiResponse::success("Graphic applied", console.canvas.clone(), None))
}

pub async fn deploy_banner(state: &AppState) -> AppResult<ApiResponse<Ack>> {
    let promotion = state.worker.read().await.canvas.to_promotion();
    let ack = match state
        .backend
        .add_promotion(&promotion)
        .await
        .and_then(|ack| ack.accepted("Failed to deploy."))
    {
        Ok(ack) => ack,
        Err(err) => return Err(backend_failure(state, err).await),
    };
    tracing::info!(title = %promotion.title, "banner deployed");
    Ok(ApiResponse::success("Promotion Added to Rotation!", ack, None))
}

/// Asks the design service for a draft and applies the first background
/// that actually loads.
pub async fn generate_design(state: &AppState, prompt: &str) -> AppResult<ApiResponse<DesignOutcome>> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("Please enter a description.".into()));
    }

    let reply = match state.backend.generate_design(prompt).await {
        Ok(reply) => reply,
        Err(err) => return Err(backend_failure(state, err).await),
    };
    let design = match reply.design {
        Some(design) if reply.success => design,
        _ => {
            let message = reply
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERATE_FAILED.to_string());
            return Err(BackendError::Rejected(message).into());
        }
    };

    let mut chosen = None;
    for candidate in image_candidates(&design.image) {
        if state.backend.image_loads(&candidate).await {
            chosen = Some(candidate);
            break;
        }
        tracing::debug!(url = %candidate, "design background failed to load");
    }
    let image = chosen.ok_or_else(|| BackendError::Rejected(NO_IMAGE.into()))?;

    let fallback_applied = image != design.image.trim();
    let note = if fallback_applied {
        FALLBACK_NOTE.to_string()
    } else {
        reply
            .note
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| GENERATED.to_string())
    };

    let mut console = state.worker.write().await;
    console.canvas = DesignCanvas {
        text: design.title,
        subtext: design.subtitle,
        image,
    };
    console.modals.ai.close(Instant::now());
    tracing::info!(fallback_applied, "design generated");

    Ok(ApiResponse::success(
        note.clone(),
        DesignOutcome {
            canvas: console.canvas.clone(),
            fallback_applied,
            note,
        },
        None,
    ))
}
