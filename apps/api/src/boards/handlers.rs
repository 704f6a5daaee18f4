//! Axum route handlers for the Boards API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::boards::composer::{
    compose_board, layout_images, plan_supply, Board, ComposeRequest, Layout, SupplyPlan,
};
use crate::errors::AppError;
use crate::models::board::{CanvasDimensions, LayoutMode, ScreenRatio};
use crate::models::image::SourceImage;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub ratio: ScreenRatio,
    pub max_width: u32,
    pub mode: LayoutMode,
    #[serde(default)]
    pub current_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub images: Vec<SourceImage>,
    pub canvas: CanvasDimensions,
    pub mode: LayoutMode,
    pub seed: Option<u64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/boards/plan
///
/// Returns the canvas for a ratio/width and how many images the mode needs to fill it.
pub async fn handle_plan(Json(request): Json<PlanRequest>) -> Result<Json<SupplyPlan>, AppError> {
    let supply = plan_supply(
        request.ratio,
        request.max_width,
        request.mode,
        request.current_count,
    )?;
    Ok(Json(supply))
}

/// POST /api/v1/boards
///
/// Full pipeline: canvas → required count → acquisition → layout.
pub async fn handle_compose(
    State(state): State<AppState>,
    Json(request): Json<ComposeRequest>,
) -> Result<Json<Board>, AppError> {
    if request.main_keyword.trim().is_empty() {
        return Err(AppError::Validation("main_keyword cannot be empty".to_string()));
    }

    let board = compose_board(&state.planner, request).await?;
    Ok(Json(board))
}

/// POST /api/v1/boards/layout
///
/// Re-lays out images the caller already holds. Never calls the provider.
pub async fn handle_layout(Json(request): Json<LayoutRequest>) -> Result<Json<Layout>, AppError> {
    let layout = layout_images(&request.images, request.canvas, request.mode, request.seed)?;
    Ok(Json(layout))
}
