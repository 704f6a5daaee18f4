use serde::{Deserialize, Serialize};

/// An image record as returned by the search provider.
///
/// Read-only to the layout engine; duplicates are expressed as new `PlacedImage`s,
/// never as new `SourceImage`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceImage {
    /// Provider-assigned identity. Deduplication key.
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub display_url: String,
    pub thumbnail_url: String,
}

impl SourceImage {
    /// Width over height. Degenerate records report a square aspect.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// One image positioned on a board by a single layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    /// Unique within one layout pass. Equal to `source_id` except for duplicates,
    /// which carry a `-dup-<index>` suffix.
    pub id: String,
    pub source_id: String,
    pub url: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub original_width: u32,
    pub original_height: u32,
}

impl PlacedImage {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn is_duplicate(&self) -> bool {
        self.id != self.source_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        let image = SourceImage {
            id: "a".to_string(),
            width: 800,
            height: 0,
            display_url: String::new(),
            thumbnail_url: String::new(),
        };
        assert_eq!(image.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_aspect_ratio_landscape() {
        let image = SourceImage {
            id: "a".to_string(),
            width: 400,
            height: 300,
            display_url: String::new(),
            thumbnail_url: String::new(),
        };
        assert!((image.aspect_ratio() - 4.0 / 3.0).abs() < f64::EPSILON);
    }
}
