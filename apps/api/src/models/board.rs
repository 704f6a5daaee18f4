use serde::{Deserialize, Serialize};

/// Target screen shape of a board. Width is always caller-supplied; height follows the ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenRatio {
    /// 9:16, phone held upright.
    Portrait,
    /// 16:9.
    Landscape,
}

impl ScreenRatio {
    /// Height-over-width multiplier for this ratio.
    pub fn height_factor(self) -> f64 {
        match self {
            ScreenRatio::Portrait => 16.0 / 9.0,
            ScreenRatio::Landscape => 9.0 / 16.0,
        }
    }

    /// Resolves concrete canvas dimensions for a width budget.
    ///
    /// `max_width` is expected to be positive and already adjusted for any UI chrome.
    /// A zero width is rejected upstream; here it is floored to 1 so the result stays valid.
    pub fn dimensions(self, max_width: u32) -> CanvasDimensions {
        let width = max_width.max(1);
        let height = (width as f64 * self.height_factor()).round().max(1.0) as u32;
        CanvasDimensions { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Overlapping, randomly scaled and rotated arrangement.
    Free,
    /// Uniform cells, centered on the canvas.
    Grid,
}

/// Pixel bounds of a board canvas. Both sides are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
}

impl CanvasDimensions {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }
}
