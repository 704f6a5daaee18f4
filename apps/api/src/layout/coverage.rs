//! Coverage accounting shared by the estimator and both layout modes.

use crate::models::image::PlacedImage;

/// Boards aim for placed area of 110% of the canvas so overlaps and margins still read as full.
pub const COVERAGE_TARGET: f64 = 1.1;

/// Placed-area goal in square pixels for a canvas.
pub fn coverage_target(canvas_width: f64, canvas_height: f64) -> f64 {
    canvas_width * canvas_height * COVERAGE_TARGET
}

/// Placed area over canvas area. Overlaps count twice; rotation is ignored.
pub fn coverage_ratio(placements: &[PlacedImage], canvas_width: f64, canvas_height: f64) -> f64 {
    let (width, height) = sanitize_canvas(canvas_width, canvas_height);
    placements.iter().map(PlacedImage::area).sum::<f64>() / (width * height)
}

/// Identity for a duplicate placement at output slot `index`.
pub fn duplicate_id(source_id: &str, index: usize) -> String {
    format!("{source_id}-dup-{index}")
}

/// Floors non-finite or sub-pixel canvas sides at 1.
pub(crate) fn sanitize_canvas(canvas_width: f64, canvas_height: f64) -> (f64, f64) {
    let clamp = |side: f64| if side.is_finite() { side.max(1.0) } else { 1.0 };
    (clamp(canvas_width), clamp(canvas_height))
}
