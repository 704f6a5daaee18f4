//! Free layout — overlapping, randomly scaled and rotated placements.
//!
//! Every unique image is placed once at a random scale, rotation and position. If the board
//! is still under the coverage target, duplicates are appended round-robin. Duplication is
//! bounded three ways (target reached, iteration budget, 2× the unique count), so a board
//! built from one or two images may stop short of the target rather than repeat them endlessly.

use std::ops::RangeInclusive;

use rand::Rng;
use tracing::debug;

use crate::layout::coverage::{coverage_target, duplicate_id, sanitize_canvas};
use crate::models::image::{PlacedImage, SourceImage};

/// Fraction of the shorter canvas side an image spans at scale 1.0.
pub const BASE_SIZE_FRACTION: f64 = 0.3;

pub const SCALE_RANGE: RangeInclusive<f64> = 0.8..=1.2;

/// Degrees either side of upright.
pub const ROTATION_RANGE: RangeInclusive<f64> = -5.0..=5.0;

/// Share of an image's extent that must stay on the canvas along each axis.
const MIN_VISIBLE_FRACTION: f64 = 0.2;

const MAX_TOP_UP_ITERATIONS: usize = 50;

/// Places every image once, then tops up with duplicates while under the coverage target.
pub fn plan_free<R: Rng + ?Sized>(
    images: &[SourceImage],
    canvas_width: f64,
    canvas_height: f64,
    rng: &mut R,
) -> Vec<PlacedImage> {
    if images.is_empty() {
        return Vec::new();
    }

    let (width, height) = sanitize_canvas(canvas_width, canvas_height);
    let base_size = width.min(height) * BASE_SIZE_FRACTION;
    let target = coverage_target(width, height);

    let mut placements: Vec<PlacedImage> = images
        .iter()
        .map(|image| place(image, image.id.clone(), base_size, width, height, &mut *rng))
        .collect();
    let mut covered: f64 = placements.iter().map(PlacedImage::area).sum();

    let budget = (2 * images.len()).min(MAX_TOP_UP_ITERATIONS);
    let max_placements = 2 * images.len();
    let mut iterations = 0;

    while covered < target && iterations < budget && placements.len() < max_placements {
        let index = placements.len();
        let source = &images[index % images.len()];
        let duplicate = place(
            source,
            duplicate_id(&source.id, index),
            base_size,
            width,
            height,
            &mut *rng,
        );
        covered += duplicate.area();
        placements.push(duplicate);
        iterations += 1;
    }

    debug!(
        unique = images.len(),
        placed = placements.len(),
        coverage = covered / (width * height),
        "Free layout complete"
    );

    placements
}

fn place<R: Rng + ?Sized>(
    image: &SourceImage,
    id: String,
    base_size: f64,
    canvas_width: f64,
    canvas_height: f64,
    rng: &mut R,
) -> PlacedImage {
    let scale = rng.random_range(SCALE_RANGE);
    let rotation = rng.random_range(ROTATION_RANGE);
    let placed_width = base_size * scale;
    let placed_height = placed_width / image.aspect_ratio();

    let max_x = (canvas_width - (1.0 - MIN_VISIBLE_FRACTION) * placed_width).max(0.0);
    let max_y = (canvas_height - (1.0 - MIN_VISIBLE_FRACTION) * placed_height).max(0.0);

    PlacedImage {
        id,
        source_id: image.id.clone(),
        url: image.display_url.clone(),
        x: rng.random_range(0.0..=max_x),
        y: rng.random_range(0.0..=max_y),
        width: placed_width,
        height: placed_height,
        scale,
        rotation,
        original_width: image.width,
        original_height: image.height,
    }
}
