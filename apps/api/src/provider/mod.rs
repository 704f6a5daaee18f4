//! Image search provider — the only module that talks to the external search API.
//!
//! Everything else sees `Arc<dyn ImageProvider>`, so the planner can be exercised against an
//! in-memory catalog in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::image::SourceImage;

pub mod unsplash;

pub use unsplash::UnsplashClient;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("Provider rejected the access key")]
    Unauthorized,

    #[error("Provider rate limit exceeded")]
    RateLimited,

    #[error("Provider HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// Paginated keyword search. Pages are 1-based.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SourceImage>, ProviderError>;
}
