use anyhow::{ensure, Context, Result};

use crate::acquisition::PlannerSettings;
use crate::provider::unsplash::{DEFAULT_BASE_URL, MAX_PAGE_SIZE};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub unsplash_access_key: String,
    pub unsplash_base_url: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            unsplash_access_key: require_env("UNSPLASH_ACCESS_KEY")?,
            unsplash_base_url: std::env::var("UNSPLASH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            page_size: parse_env("PROVIDER_PAGE_SIZE", MAX_PAGE_SIZE)?,
            max_pages: parse_env("PROVIDER_MAX_PAGES", 3)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_PAGE_SIZE).contains(&self.page_size),
            "PROVIDER_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}"
        );
        ensure!(self.max_pages >= 1, "PROVIDER_MAX_PAGES must be at least 1");
        Ok(())
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            page_size: self.page_size,
            max_pages: self.max_pages,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(page_size: u32, max_pages: u32) -> Config {
        Config {
            unsplash_access_key: "key".to_string(),
            unsplash_base_url: DEFAULT_BASE_URL.to_string(),
            page_size,
            max_pages,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config(30, 3).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_page() {
        assert!(config(31, 3).validate().is_err());
        assert!(config(0, 3).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_pages() {
        assert!(config(30, 0).validate().is_err());
    }

    #[test]
    fn test_planner_settings_from_config() {
        let settings = config(10, 2).planner_settings();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.max_pages, 2);
    }
}
