//! Content categories and the text/photo balance of a finished image set.
//!
//! Category comes from the query that produced an image, not from its pixels: a query mentioning
//! quotes, typography or text marks its results as text-based.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::image::SourceImage;

/// Upper bound on text-based images, as a percentage of the required count.
pub const TEXT_SHARE_PERCENT: usize = 30;

const TEXT_MARKERS: [&str; 3] = ["quote", "typography", "text"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    TextBased,
    Photographic,
}

impl ImageCategory {
    pub fn from_query(query: &str) -> Self {
        let query = query.to_lowercase();
        if TEXT_MARKERS.iter().any(|marker| query.contains(marker)) {
            ImageCategory::TextBased
        } else {
            ImageCategory::Photographic
        }
    }
}

/// An image together with the query string that surfaced it.
#[derive(Debug, Clone)]
pub struct TaggedImage {
    pub image: SourceImage,
    pub query: String,
}

impl TaggedImage {
    pub fn category(&self) -> ImageCategory {
        ImageCategory::from_query(&self.query)
    }
}

/// Most text-based images a set of `required` may contain.
pub fn text_cap(required: usize) -> usize {
    required * TEXT_SHARE_PERCENT / 100
}

/// Picks at most `required` images: text-based capped at `text_cap(required)`, photographic
/// filling the rest. Each pool is shuffled before truncation and the result is shuffled again,
/// so neither category nor keyword order survives.
///
/// `pool` must already be deduplicated.
pub fn balance_categories<R: Rng + ?Sized>(
    pool: Vec<TaggedImage>,
    required: usize,
    rng: &mut R,
) -> Vec<SourceImage> {
    let (mut text, mut photo): (Vec<_>, Vec<_>) = pool
        .into_iter()
        .partition(|tagged| tagged.category() == ImageCategory::TextBased);

    text.shuffle(rng);
    photo.shuffle(rng);

    text.truncate(text_cap(required));
    photo.truncate(required - text.len());

    let mut combined: Vec<SourceImage> = text
        .into_iter()
        .chain(photo)
        .map(|tagged| tagged.image)
        .collect();
    combined.shuffle(rng);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tagged(id: &str, query: &str) -> TaggedImage {
        TaggedImage {
            image: SourceImage {
                id: id.to_string(),
                width: 100,
                height: 100,
                display_url: format!("https://img.test/{id}"),
                thumbnail_url: format!("https://img.test/{id}/t"),
            },
            query: query.to_string(),
        }
    }

    fn pool(text: usize, photo: usize) -> Vec<TaggedImage> {
        (0..text)
            .map(|i| tagged(&format!("t{i}"), "coffee quote typography"))
            .chain((0..photo).map(|i| tagged(&format!("p{i}"), "coffee aesthetic")))
            .collect()
    }

    #[test]
    fn test_category_from_query() {
        assert_eq!(ImageCategory::from_query("coffee quote typography"), ImageCategory::TextBased);
        assert_eq!(ImageCategory::from_query("Hand TEXT art"), ImageCategory::TextBased);
        assert_eq!(ImageCategory::from_query("coffee minimal"), ImageCategory::Photographic);
    }

    #[test]
    fn test_text_cap_is_thirty_percent_floor() {
        assert_eq!(text_cap(20), 6);
        assert_eq!(text_cap(9), 2);
        assert_eq!(text_cap(3), 0);
    }

    #[test]
    fn test_text_pool_truncated() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = balance_categories(pool(15, 30), 20, &mut rng);

        assert_eq!(result.len(), 20);
        let text = result.iter().filter(|i| i.id.starts_with('t')).count();
        assert_eq!(text, 6, "Text-based share is capped at 30%");
    }

    #[test]
    fn test_photos_fill_when_text_scarce() {
        let mut rng = StdRng::seed_from_u64(2);
        let result = balance_categories(pool(2, 30), 20, &mut rng);

        assert_eq!(result.len(), 20);
        let photos = result.iter().filter(|i| i.id.starts_with('p')).count();
        assert_eq!(photos, 18);
    }

    #[test]
    fn test_short_supply_returns_what_fits() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = balance_categories(pool(10, 4), 20, &mut rng);
        assert_eq!(result.len(), 10, "6 text (capped) + 4 photographic");
    }

    #[test]
    fn test_result_is_shuffled_across_categories() {
        let mut rng = StdRng::seed_from_u64(4);
        let result = balance_categories(pool(6, 14), 20, &mut rng);
        let first_six_all_text = result.iter().take(6).all(|i| i.id.starts_with('t'));
        assert!(!first_six_all_text, "Text images must not cluster at the front");
    }
}
