//! Supply estimation — how many images a board needs before any are fetched.
//!
//! Estimates are advisory. The acquisition planner uses them as a fetch target, and the
//! layout engine re-checks coverage against the images it actually gets.

use crate::layout::coverage::{coverage_target, sanitize_canvas};
use crate::layout::free::BASE_SIZE_FRACTION;
use crate::layout::grid::solve_grid;
use crate::models::board::LayoutMode;

/// Grid shape is re-solved once the true count is known and rarely tiles perfectly.
const GRID_SAFETY_FACTOR: f64 = 1.2;

/// Absorbs overlap and randomness of free placement.
const FREE_SAFETY_FACTOR: f64 = 1.3;

/// Height over width of the assumed average free-mode image (4:3 landscape).
const ASSUMED_HEIGHT_RATIO: f64 = 3.0 / 4.0;

/// Midpoint of the free-mode scale range.
const ASSUMED_SCALE: f64 = 1.0;

/// Minimum image count needed to reach the coverage target in `mode`.
///
/// `current_count` seeds the grid shape; pass 0 when nothing has been fetched yet.
/// Always returns at least 1.
pub fn estimate_required_count(
    canvas_width: f64,
    canvas_height: f64,
    mode: LayoutMode,
    current_count: usize,
) -> usize {
    let (width, height) = sanitize_canvas(canvas_width, canvas_height);
    let target = coverage_target(width, height);

    let (unit_area, safety) = match mode {
        LayoutMode::Grid => {
            let solution = solve_grid(current_count.max(1), width, height);
            (solution.cell_area(), GRID_SAFETY_FACTOR)
        }
        LayoutMode::Free => {
            let image_width = width.min(height) * BASE_SIZE_FRACTION * ASSUMED_SCALE;
            (image_width * image_width * ASSUMED_HEIGHT_RATIO, FREE_SAFETY_FACTOR)
        }
    };

    let needed = (target / unit_area.max(1.0)).ceil();
    ((needed * safety).ceil() as usize).max(1)
}
