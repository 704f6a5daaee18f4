//! Acquisition Planner — fetches exactly the images a board needs.
//!
//! # Flow
//! 1. Normalize keywords and split the required count into per-keyword quotas.
//! 2. Fetch every keyword concurrently. Each keyword walks `QUERY_VARIATIONS` in order and pages
//!    each query sequentially until its quota is met, a page comes back empty or short, or
//!    `max_pages` is hit.
//! 3. If the merged, deduplicated pool is short, split the shortfall across keywords that
//!    returned anything and fetch once more, resuming where each keyword stopped.
//! 4. Balance text-based against photographic images and shuffle.
//!
//! # Errors
//! A failure on the first page of a query ends that query. It also ends the keyword when the
//! keyword holds nothing yet or the provider rejected the key or the rate limit, since every
//! later variation would fail the same way. Otherwise the keyword moves on to its next
//! variation. Failures on later pages keep what the query already returned and move on too.
//! `acquire` only fails when no keyword produced a single image.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::acquisition::category::{balance_categories, TaggedImage};
use crate::acquisition::keywords::{build_query, normalize_keywords, split_quota, QUERY_VARIATIONS};
use crate::acquisition::AcquisitionError;
use crate::models::image::SourceImage;
use crate::provider::{ImageProvider, ProviderError};

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerSettings {
    /// Fixed `per_page` sent with every search.
    pub page_size: u32,
    /// Pages fetched per query before moving to the next variation.
    pub max_pages: u32,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            page_size: 30,
            max_pages: 3,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-keyword fetch state
// ────────────────────────────────────────────────────────────────────────────

/// Where one keyword's fetch stands. Survives between rounds so redistribution resumes
/// exactly where the first round stopped.
#[derive(Debug)]
struct KeywordCursor {
    keyword: String,
    variation: usize,
    page: u32,
    seen: HashSet<String>,
    collected: Vec<TaggedImage>,
    failed: bool,
}

impl KeywordCursor {
    fn new(keyword: String) -> Self {
        Self {
            keyword,
            variation: 0,
            page: 1,
            seen: HashSet::new(),
            collected: Vec::new(),
            failed: false,
        }
    }

    fn exhausted(&self) -> bool {
        self.failed || self.variation >= QUERY_VARIATIONS.len()
    }

    fn current_query(&self) -> String {
        build_query(&self.keyword, QUERY_VARIATIONS[self.variation])
    }

    fn next_variation(&mut self) {
        self.variation += 1;
        self.page = 1;
    }

    /// Adds a page of results, skipping ids this keyword already holds.
    fn absorb(&mut self, query: &str, images: Vec<SourceImage>) -> usize {
        let before = self.collected.len();
        for image in images {
            if self.seen.insert(image.id.clone()) {
                self.collected.push(TaggedImage {
                    image,
                    query: query.to_string(),
                });
            }
        }
        self.collected.len() - before
    }
}

/// Result of one keyword task: its cursor plus the error that stopped it, if any.
type KeywordOutcome = (KeywordCursor, Option<ProviderError>);

/// Pages through `cursor`'s queries until `additional` more unique images are held.
async fn fetch_keyword(
    provider: Arc<dyn ImageProvider>,
    settings: PlannerSettings,
    mut cursor: KeywordCursor,
    additional: usize,
) -> KeywordOutcome {
    let target = cursor.collected.len() + additional;

    while cursor.collected.len() < target && !cursor.exhausted() {
        let query = cursor.current_query();
        let page = cursor.page;

        match provider.search(&query, page, settings.page_size).await {
            Ok(images) => {
                let short = images.len() < settings.page_size as usize;
                let added = cursor.absorb(&query, images);
                debug!(query = %query, page, added, short, "Fetched page");

                if short || page >= settings.max_pages {
                    cursor.next_variation();
                } else {
                    cursor.page += 1;
                }
            }
            Err(e) if page == 1 && stops_keyword(&e, &cursor) => {
                warn!(query = %query, error = %e, "First page failed, stopping keyword");
                cursor.failed = true;
                return (cursor, Some(e));
            }
            Err(e) if page == 1 => {
                warn!(query = %query, error = %e, "First page failed, skipping query");
                cursor.next_variation();
            }
            Err(e) => {
                warn!(
                    query = %query,
                    page,
                    error = %e,
                    "Later page failed, keeping results collected so far"
                );
                cursor.next_variation();
            }
        }
    }

    (cursor, None)
}

/// Auth and quota failures repeat for every query; a keyword with nothing yet has no partial
/// result to fall back on.
fn stops_keyword(error: &ProviderError, cursor: &KeywordCursor) -> bool {
    matches!(error, ProviderError::Unauthorized | ProviderError::RateLimited)
        || cursor.collected.is_empty()
}

// ────────────────────────────────────────────────────────────────────────────
// Planner
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AcquisitionPlanner {
    provider: Arc<dyn ImageProvider>,
    settings: PlannerSettings,
}

impl AcquisitionPlanner {
    pub fn new(provider: Arc<dyn ImageProvider>, settings: PlannerSettings) -> Self {
        Self { provider, settings }
    }

    /// Fetches up to `required` unique, category-balanced images for `main_keyword` and
    /// `sub_keywords`. The result may be shorter when the provider runs dry.
    ///
    /// `rng` drives the final shuffles only; it is not touched until every fetch has settled.
    pub async fn acquire<R: Rng + Send + ?Sized>(
        &self,
        main_keyword: &str,
        sub_keywords: &[String],
        required: usize,
        rng: &mut R,
    ) -> Result<Vec<SourceImage>, AcquisitionError> {
        let keywords = normalize_keywords(main_keyword, sub_keywords)?;
        if required == 0 {
            return Err(AcquisitionError::InvalidInput(
                "required count must be positive".to_string(),
            ));
        }

        let quota = split_quota(required, keywords.len());
        info!(
            keywords = ?keywords,
            required,
            quota,
            "Starting image acquisition"
        );

        let cursors: Vec<KeywordCursor> = keywords.into_iter().map(KeywordCursor::new).collect();
        let quotas = vec![quota; cursors.len()];
        let mut outcomes = self.run_round(cursors, quotas).await?;

        let unique = unique_count(&outcomes);
        if unique < required {
            let productive = outcomes
                .iter()
                .filter(|(cursor, _)| !cursor.collected.is_empty())
                .count();

            if productive > 0 {
                let extra = split_quota(required - unique, productive);
                info!(
                    shortfall = required - unique,
                    productive,
                    extra,
                    "Redistributing shortfall across productive keywords"
                );

                let (cursors, errors): (Vec<_>, Vec<_>) = outcomes.into_iter().unzip();
                let quotas = cursors
                    .iter()
                    .map(|c| if c.collected.is_empty() { 0 } else { extra })
                    .collect();
                let refetched = self.run_round(cursors, quotas).await?;

                // First-round errors stay attached to their keyword.
                outcomes = refetched
                    .into_iter()
                    .zip(errors)
                    .map(|((cursor, late), early)| (cursor, early.or(late)))
                    .collect();
            }
        }

        let pool = merge(outcomes)?;
        let images = balance_categories(pool, required, rng);

        info!(
            required,
            returned = images.len(),
            "Image acquisition complete"
        );

        Ok(images)
    }

    /// Runs one concurrent fetch round. Keywords with a zero quota pass through untouched.
    /// Outcomes come back in input order.
    async fn run_round(
        &self,
        cursors: Vec<KeywordCursor>,
        quotas: Vec<usize>,
    ) -> Result<Vec<KeywordOutcome>, AcquisitionError> {
        let mut slots: Vec<Option<KeywordOutcome>> = Vec::with_capacity(cursors.len());
        let mut tasks = JoinSet::new();

        for (index, (cursor, quota)) in cursors.into_iter().zip(quotas).enumerate() {
            if quota == 0 || cursor.exhausted() {
                slots.push(Some((cursor, None)));
                continue;
            }
            slots.push(None);

            let provider = Arc::clone(&self.provider);
            let settings = self.settings;
            tasks.spawn(async move { (index, fetch_keyword(provider, settings, cursor, quota).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = joined?;
            slots[index] = Some(outcome);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn unique_count(outcomes: &[KeywordOutcome]) -> usize {
    outcomes
        .iter()
        .flat_map(|(cursor, _)| cursor.collected.iter())
        .map(|tagged| tagged.image.id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Deduplicates across keywords, first keyword wins. Fails only if nothing was collected and
/// some keyword hit an error; the earliest keyword's error (the main keyword's, when it failed)
/// is reported.
fn merge(outcomes: Vec<KeywordOutcome>) -> Result<Vec<TaggedImage>, AcquisitionError> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();
    let mut first_error = None;

    for (cursor, error) in outcomes {
        if let Some(e) = error {
            if cursor.collected.is_empty() {
                warn!(keyword = %cursor.keyword, error = %e, "Keyword produced no images");
            }
            first_error.get_or_insert(e);
        }
        for tagged in cursor.collected {
            if seen.insert(tagged.image.id.clone()) {
                pool.push(tagged);
            }
        }
    }

    match first_error {
        Some(e) if pool.is_empty() => Err(AcquisitionError::Provider(e)),
        _ => Ok(pool),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
