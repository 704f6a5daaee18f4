//! Grid layout — uniform square cells, centered on the canvas.
//!
//! # Algorithm
//! 1. `solve_grid` picks cols/rows for the image count so the grid follows the canvas aspect.
//! 2. If the solved cells fall short of the coverage target, the whole grid is re-solved for an
//!    inflated count. A larger count changes the best grid shape, so the first solution is
//!    never patched.
//! 3. Cells are filled row-major; positions past the unique set reuse images round-robin
//!    under a `-dup-<index>` id.
//!
//! If the re-solved grid no longer fits the canvas, the unique-only grid is used as is. Only
//! when that one is degenerate too (canvas too small for the gaps, non-finite sizes) does the
//! explicit single-column fallback run. Nothing here can fail.

use tracing::{debug, warn};

use crate::layout::coverage::{coverage_target, duplicate_id, sanitize_canvas};
use crate::models::image::{PlacedImage, SourceImage};

// ────────────────────────────────────────────────────────────────────────────
// Constants
// ────────────────────────────────────────────────────────────────────────────

/// Gap between adjacent cells, in pixels, on both axes.
pub const GRID_GAP: f64 = 4.0;

/// Smallest side a fallback square may shrink to.
const FALLBACK_MIN_SIDE: f64 = 50.0;

/// Fallback column never stacks more images than this.
const FALLBACK_MAX_IMAGES: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Grid solution
// ────────────────────────────────────────────────────────────────────────────

/// Shape of a grid for a given image count and canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSolution {
    pub cols: usize,
    pub rows: usize,
    /// Side of one square cell, whole pixels, at least 1.
    pub cell_size: f64,
}

impl GridSolution {
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn cell_area(&self) -> f64 {
        self.cell_size * self.cell_size
    }

    pub fn used_width(&self) -> f64 {
        self.cols as f64 * self.cell_size + GRID_GAP * (self.cols as f64 - 1.0)
    }

    pub fn used_height(&self) -> f64 {
        self.rows as f64 * self.cell_size + GRID_GAP * (self.rows as f64 - 1.0)
    }

    /// A solution is usable when its geometry is finite and it fits inside the canvas.
    fn fits(&self, canvas_width: f64, canvas_height: f64) -> bool {
        self.cell_size.is_finite()
            && self.cell_size >= 1.0
            && self.used_width() <= canvas_width
            && self.used_height() <= canvas_height
    }
}

/// Solves grid dimensions for `count` images on a `canvas_width × canvas_height` canvas.
///
/// Columns start at `ceil(sqrt(count × W/H))`; rows follow. Trailing empty rows are dropped,
/// then trailing empty columns (re-deriving rows after each column change). The cell is the
/// largest square that fits both axes after subtracting gaps. Every intermediate is floored at 1.
pub fn solve_grid(count: usize, canvas_width: f64, canvas_height: f64) -> GridSolution {
    let n = count.max(1);
    let (width, height) = sanitize_canvas(canvas_width, canvas_height);

    let mut cols = ((n as f64 * width / height).sqrt().ceil() as usize).clamp(1, n);
    let mut rows = n.div_ceil(cols).max(1);

    while rows > 1 && (rows - 1) * cols >= n {
        rows -= 1;
    }
    while cols > 1 && (cols - 1) * rows >= n {
        cols -= 1;
        rows = n.div_ceil(cols).max(1);
    }

    let available_width = (width - GRID_GAP * (cols as f64 - 1.0)).max(1.0);
    let available_height = (height - GRID_GAP * (rows as f64 - 1.0)).max(1.0);
    let cell_size = (available_width / cols as f64)
        .min(available_height / rows as f64)
        .floor()
        .max(1.0);

    GridSolution {
        cols,
        rows,
        cell_size,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Places `images` on a centered grid, topping up with duplicates when the unique set
/// cannot reach the coverage target. Empty input yields an empty board.
///
/// Every cell of the chosen `cols × rows` grid is filled, so the last row is completed with
/// duplicates and the result may hold more placements than the count the grid was solved for.
pub fn plan_grid(images: &[SourceImage], canvas_width: f64, canvas_height: f64) -> Vec<PlacedImage> {
    if images.is_empty() {
        return Vec::new();
    }

    let (width, height) = sanitize_canvas(canvas_width, canvas_height);
    let target = coverage_target(width, height);

    let unique_fit = solve_grid(images.len(), width, height);
    let covered = images.len() as f64 * unique_fit.cell_area();
    let mut solution = unique_fit;

    if covered < target {
        let deficit = target - covered;
        let extra = (deficit / unique_fit.cell_area()).ceil().max(1.0) as usize;
        let inflated = images.len() + extra;
        debug!(
            unique = images.len(),
            inflated,
            covered,
            target,
            "Grid below coverage target, re-solving for inflated count"
        );
        let inflated_fit = solve_grid(inflated, width, height);
        solution = if inflated_fit.fits(width, height) {
            inflated_fit
        } else {
            debug!(inflated, "Inflated grid does not fit, keeping unique-only grid");
            unique_fit
        };
    }

    if !solution.fits(width, height) {
        warn!(
            cols = solution.cols,
            rows = solution.rows,
            cell_size = solution.cell_size,
            width,
            height,
            "Degenerate grid, using single-column fallback"
        );
        return single_column(images, width, height);
    }

    populate(images, &solution, width, height)
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Fills every cell of `solution` row-major, centered with symmetric offsets.
fn populate(
    images: &[SourceImage],
    solution: &GridSolution,
    canvas_width: f64,
    canvas_height: f64,
) -> Vec<PlacedImage> {
    let offset_x = ((canvas_width - solution.used_width()) / 2.0).max(0.0);
    let offset_y = ((canvas_height - solution.used_height()) / 2.0).max(0.0);
    let step = solution.cell_size + GRID_GAP;

    (0..solution.cell_count())
        .map(|index| {
            let row = index / solution.cols;
            let col = index % solution.cols;
            cell_placement(
                images,
                index,
                offset_x + col as f64 * step,
                offset_y + row as f64 * step,
                solution.cell_size,
            )
        })
        .collect()
}

/// Stacks up to `FALLBACK_MAX_IMAGES` squares in one horizontally centered column.
fn single_column(images: &[SourceImage], canvas_width: f64, canvas_height: f64) -> Vec<PlacedImage> {
    let count = images.len().min(FALLBACK_MAX_IMAGES);
    let side = (canvas_height / count as f64).max(FALLBACK_MIN_SIDE);
    let x = ((canvas_width - side) / 2.0).max(0.0);

    (0..count)
        .map(|index| cell_placement(images, index, x, index as f64 * (side + GRID_GAP), side))
        .collect()
}

/// Builds the placement for output slot `index`, duplicating past the unique set.
fn cell_placement(images: &[SourceImage], index: usize, x: f64, y: f64, side: f64) -> PlacedImage {
    let source = &images[index % images.len()];
    let id = if index < images.len() {
        source.id.clone()
    } else {
        duplicate_id(&source.id, index)
    };

    PlacedImage {
        id,
        source_id: source.id.clone(),
        url: source.display_url.clone(),
        x,
        y,
        width: side,
        height: side,
        scale: 1.0,
        rotation: 0.0,
        original_width: source.width,
        original_height: source.height,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
