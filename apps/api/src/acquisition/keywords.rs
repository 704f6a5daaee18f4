//! Keyword normalization, per-keyword quotas and query variations.

use std::collections::HashSet;

use crate::acquisition::AcquisitionError;

/// Suffixes appended to each keyword, in fetch order. The empty entry is the plain keyword.
pub const QUERY_VARIATIONS: [&str; 6] = [
    "",
    "aesthetic",
    "lifestyle",
    "minimal",
    "inspirational",
    "quote typography",
];

/// Main keyword first, then secondaries not already present (case-insensitive).
/// Blank secondaries are skipped; a blank main keyword is rejected.
pub fn normalize_keywords(main: &str, subs: &[String]) -> Result<Vec<String>, AcquisitionError> {
    let main = main.trim();
    if main.is_empty() {
        return Err(AcquisitionError::InvalidInput(
            "main keyword cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::from([main.to_lowercase()]);
    let mut keywords = vec![main.to_string()];

    for sub in subs.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if seen.insert(sub.to_lowercase()) {
            keywords.push(sub.to_string());
        }
    }

    Ok(keywords)
}

/// Even ceiling split of `required` across `keyword_count` keywords.
pub fn split_quota(required: usize, keyword_count: usize) -> usize {
    required.div_ceil(keyword_count.max(1))
}

pub fn build_query(keyword: &str, variation: &str) -> String {
    if variation.is_empty() {
        keyword.to_string()
    } else {
        format!("{keyword} {variation}")
    }
}
