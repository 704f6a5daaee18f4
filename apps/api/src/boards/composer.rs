//! Board Composer — wires the resolver, estimator, planner and layout engine together.
//!
//! Handlers stay thin: validation and orchestration live here so the whole pipeline can be
//! driven from tests without HTTP.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::acquisition::AcquisitionPlanner;
use crate::errors::AppError;
use crate::layout::{coverage_ratio, estimate_required_count, plan};
use crate::models::board::{CanvasDimensions, LayoutMode, ScreenRatio};
use crate::models::image::{PlacedImage, SourceImage};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Canvas size and image demand for a ratio/mode/width combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyPlan {
    pub canvas: CanvasDimensions,
    pub required_count: usize,
}

/// A laid-out image set for one canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub placements: Vec<PlacedImage>,
    /// Placed area over canvas area (overlaps counted twice).
    pub coverage: f64,
}

/// A complete board: fetched images plus their placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub board_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub canvas: CanvasDimensions,
    pub mode: LayoutMode,
    pub required_count: usize,
    pub images: Vec<SourceImage>,
    pub placements: Vec<PlacedImage>,
    pub coverage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComposeRequest {
    pub main_keyword: String,
    #[serde(default)]
    pub sub_keywords: Vec<String>,
    pub ratio: ScreenRatio,
    pub max_width: u32,
    pub mode: LayoutMode,
    /// Fixes the random source for reproducible boards.
    pub seed: Option<u64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Resolves the canvas and estimates how many images it needs.
pub fn plan_supply(
    ratio: ScreenRatio,
    max_width: u32,
    mode: LayoutMode,
    current_count: usize,
) -> Result<SupplyPlan, AppError> {
    if max_width == 0 {
        return Err(AppError::Validation("max_width must be positive".to_string()));
    }

    let canvas = ratio.dimensions(max_width);
    let required_count = estimate_required_count(
        canvas.width as f64,
        canvas.height as f64,
        mode,
        current_count,
    );

    Ok(SupplyPlan {
        canvas,
        required_count,
    })
}

/// Lays out an existing image set. This is the "regenerate" path: no provider calls.
pub fn layout_images(
    images: &[SourceImage],
    canvas: CanvasDimensions,
    mode: LayoutMode,
    seed: Option<u64>,
) -> Result<Layout, AppError> {
    let canvas = CanvasDimensions::new(canvas.width, canvas.height).ok_or_else(|| {
        AppError::Validation("canvas dimensions must be positive".to_string())
    })?;

    let mut rng = make_rng(seed);
    let (width, height) = (canvas.width as f64, canvas.height as f64);
    let placements = plan(images, width, height, mode, &mut rng);
    let coverage = coverage_ratio(&placements, width, height);

    Ok(Layout {
        placements,
        coverage,
    })
}

/// Full pipeline: resolve → estimate → acquire → lay out.
pub async fn compose_board(
    planner: &AcquisitionPlanner,
    request: ComposeRequest,
) -> Result<Board, AppError> {
    let supply = plan_supply(request.ratio, request.max_width, request.mode, 0)?;

    let mut rng = make_rng(request.seed);
    let images = planner
        .acquire(
            &request.main_keyword,
            &request.sub_keywords,
            supply.required_count,
            &mut rng,
        )
        .await?;

    let (width, height) = (supply.canvas.width as f64, supply.canvas.height as f64);
    let placements = plan(&images, width, height, request.mode, &mut rng);
    let coverage = coverage_ratio(&placements, width, height);

    info!(
        mode = ?request.mode,
        required = supply.required_count,
        fetched = images.len(),
        placed = placements.len(),
        duplicates = placements.iter().filter(|p| p.is_duplicate()).count(),
        coverage,
        "Board composed"
    );

    Ok(Board {
        board_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        canvas: supply.canvas,
        mode: request.mode,
        required_count: supply.required_count,
        images,
        placements,
        coverage,
    })
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
