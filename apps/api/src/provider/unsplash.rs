//! Unsplash search client.
//!
//! `GET /search/photos?query=…&page=…&per_page=…` with `Authorization: Client-ID <key>`.
//! Transport failures and 5xx responses are retried with exponential backoff; 4xx are final.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::image::SourceImage;
use crate::provider::{ImageProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";
/// Largest `per_page` Unsplash accepts.
pub const MAX_PAGE_SIZE: u32 = 30;
const API_VERSION: &str = "v1";
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    width: u32,
    height: u32,
    urls: UnsplashUrls,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    regular: Option<String>,
    small: Option<String>,
    thumb: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnsplashErrorBody {
    errors: Vec<String>,
}

impl UnsplashPhoto {
    /// Records without any display-quality URL are dropped.
    fn into_source_image(self) -> Option<SourceImage> {
        let display_url = self.urls.regular.or_else(|| self.urls.small.clone())?;
        let thumbnail_url = self
            .urls
            .thumb
            .or(self.urls.small)
            .unwrap_or_else(|| display_url.clone());

        Some(SourceImage {
            id: self.id,
            width: self.width,
            height: self.height,
            display_url,
            thumbnail_url,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct UnsplashClient {
    client: Client,
    access_key: String,
    base_url: String,
}

impl UnsplashClient {
    pub fn new(access_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageProvider for UnsplashClient {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SourceImage>, ProviderError> {
        let url = format!("{}/search/photos", self.base_url);
        let page_param = page.max(1).to_string();
        let per_page_param = per_page.clamp(1, MAX_PAGE_SIZE).to_string();

        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    query,
                    page,
                    "Search attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Client-ID {}", self.access_key))
                .header("Accept-Version", API_VERSION)
                .query(&[
                    ("query", query),
                    ("page", page_param.as_str()),
                    ("per_page", per_page_param.as_str()),
                ])
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ProviderError::Network(e.to_string()));
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Unsplash returned {}: {}", status, body);
                last_error = Some(classify_status(status, None, &body));
                continue;
            }

            if !status.is_success() {
                let remaining = response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let body = response.text().await.unwrap_or_default();
                return Err(classify_status(status, remaining.as_deref(), &body));
            }

            let parsed: SearchResponse =
                response.json().await.map_err(|e| ProviderError::Http {
                    status: status.as_u16(),
                    message: format!("Malformed search response: {e}"),
                })?;

            let images: Vec<SourceImage> = parsed
                .results
                .into_iter()
                .filter_map(UnsplashPhoto::into_source_image)
                .collect();

            debug!(query, page, returned = images.len(), "Unsplash search page");

            return Ok(images);
        }

        Err(last_error.unwrap_or_else(|| ProviderError::Network("no attempt made".to_string())))
    }
}

/// Maps a non-success response to the provider error taxonomy.
///
/// Unsplash signals an exhausted hourly quota with 403 and `X-Ratelimit-Remaining: 0`.
fn classify_status(status: StatusCode, rate_limit_remaining: Option<&str>, body: &str) -> ProviderError {
    let exhausted = rate_limit_remaining.map(str::trim) == Some("0");

    match status {
        StatusCode::UNAUTHORIZED => ProviderError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        StatusCode::FORBIDDEN if exhausted => ProviderError::RateLimited,
        _ => ProviderError::Http {
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// Joins Unsplash's `{"errors": [...]}` body, or returns the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<UnsplashErrorBody>(body)
        .map(|e| e.errors.join("; "))
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, None, ""),
            ProviderError::Unauthorized
        );
    }

    #[test]
    fn test_classify_rate_limited() {
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, None, ""),
            ProviderError::RateLimited
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, Some("0"), "Rate Limit Exceeded"),
            ProviderError::RateLimited
        );
    }

    #[test]
    fn test_classify_forbidden_with_quota_left_is_http() {
        let err = classify_status(
            StatusCode::FORBIDDEN,
            Some("42"),
            r#"{"errors": ["Access forbidden"]}"#,
        );
        assert_eq!(
            err,
            ProviderError::Http {
                status: 403,
                message: "Access forbidden".to_string()
            }
        );
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("plain failure"), "plain failure");
        assert_eq!(error_message(r#"{"errors": ["a", "b"]}"#), "a; b");
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "total": 2,
            "total_pages": 1,
            "results": [
                {
                    "id": "abc",
                    "width": 4000,
                    "height": 3000,
                    "urls": {
                        "raw": "https://images.unsplash.com/abc?raw",
                        "regular": "https://images.unsplash.com/abc?w=1080",
                        "small": "https://images.unsplash.com/abc?w=400",
                        "thumb": "https://images.unsplash.com/abc?w=200"
                    }
                },
                {
                    "id": "no-display",
                    "width": 10,
                    "height": 10,
                    "urls": { "thumb": "https://images.unsplash.com/x?w=200" }
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let images: Vec<_> = parsed
            .results
            .into_iter()
            .filter_map(UnsplashPhoto::into_source_image)
            .collect();

        assert_eq!(images.len(), 1, "Records without a display URL are dropped");
        assert_eq!(images[0].id, "abc");
        assert_eq!(images[0].display_url, "https://images.unsplash.com/abc?w=1080");
        assert_eq!(images[0].thumbnail_url, "https://images.unsplash.com/abc?w=200");
        assert_eq!((images[0].width, images[0].height), (4000, 3000));
    }

    #[test]
    fn test_display_falls_back_to_small() {
        let photo = UnsplashPhoto {
            id: "s".to_string(),
            width: 1,
            height: 1,
            urls: UnsplashUrls {
                regular: None,
                small: Some("small".to_string()),
                thumb: None,
            },
        };
        let image = photo.into_source_image().unwrap();
        assert_eq!(image.display_url, "small");
        assert_eq!(image.thumbnail_url, "small");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = UnsplashClient::new("key".to_string(), "https://api.test/".to_string()).unwrap();
        assert_eq!(client.base_url, "https://api.test");
    }
}
