//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Upper bound on extra primary attempts before falling back.
pub const MAX_PRIMARY_RETRIES: u32 = 5;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote catalog service settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Source routing override
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Fallback dataset settings
    #[serde(default)]
    pub fixture: FixtureConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Overrides for the built-in category display table
    #[serde(default)]
    pub category_display: Vec<CategoryDisplayEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let catalog = &self.catalog;
        if catalog.base_url.trim().is_empty() {
            return Err(AppError::validation("catalog.base_url is empty"));
        }
        url::Url::parse(&catalog.base_url)
            .map_err(|e| AppError::validation(format!("catalog.base_url is invalid: {e}")))?;
        if catalog.user_agent.trim().is_empty() {
            return Err(AppError::validation("catalog.user_agent is empty"));
        }
        if catalog.timeout_secs == 0 {
            return Err(AppError::validation("catalog.timeout_secs must be > 0"));
        }
        if catalog.probe_timeout_ms == 0 {
            return Err(AppError::validation("catalog.probe_timeout_ms must be > 0"));
        }
        if catalog.default_page_size == 0 {
            return Err(AppError::validation(
                "catalog.default_page_size must be > 0",
            ));
        }
        if catalog.primary_retries > MAX_PRIMARY_RETRIES {
            return Err(AppError::validation(format!(
                "catalog.primary_retries must be <= {MAX_PRIMARY_RETRIES}"
            )));
        }
        for entry in &self.category_display {
            if entry.name.trim().is_empty() {
                return Err(AppError::validation("category_display entry has empty name"));
            }
        }
        Ok(())
    }
}

/// Remote catalog service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog service
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds for search/detail calls
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Liveness probe budget in milliseconds
    #[serde(default = "defaults::probe_timeout")]
    pub probe_timeout_ms: u64,

    #[serde(default = "defaults::health_path")]
    pub health_path: String,

    #[serde(default = "defaults::search_path")]
    pub search_path: String,

    /// Detail lookups go to `{detail_path}/{id}`
    #[serde(default = "defaults::detail_path")]
    pub detail_path: String,

    #[serde(default = "defaults::categories_path")]
    pub categories_path: String,

    /// Re-probe once a cached outcome is this old. 0 keeps it forever.
    #[serde(default)]
    pub health_ttl_secs: u64,

    /// Extra primary attempts on transient failure before falling back
    #[serde(default)]
    pub primary_retries: u32,

    #[serde(default = "defaults::page_size")]
    pub default_page_size: u32,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn health_ttl(&self) -> Option<Duration> {
        (self.health_ttl_secs > 0).then(|| Duration::from_secs(self.health_ttl_secs))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            probe_timeout_ms: defaults::probe_timeout(),
            health_path: defaults::health_path(),
            search_path: defaults::search_path(),
            detail_path: defaults::detail_path(),
            categories_path: defaults::categories_path(),
            health_ttl_secs: 0,
            primary_retries: 0,
            default_page_size: defaults::page_size(),
        }
    }
}

/// Which source calls are pinned to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Route by observed health
    #[default]
    Auto,
    /// Always try the primary first, falling back on failure
    Primary,
    /// Always use the secondary
    Secondary,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutingConfig {
    #[serde(default)]
    pub mode: RoutingMode,
}

/// Fallback dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FixtureConfig {
    /// JSON dataset path; the built-in dataset is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Display attributes for one category name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDisplayEntry {
    pub name: String,
    pub icon: String,
    pub color_theme: String,
    #[serde(default)]
    pub featured: bool,
}

mod defaults {
    pub fn base_url() -> String {
        "http://localhost:8080".into()
    }
    pub fn user_agent() -> String {
        "storefront/0.1".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn probe_timeout() -> u64 {
        3000
    }
    pub fn health_path() -> String {
        "/actuator/health".into()
    }
    pub fn search_path() -> String {
        "/api/products/search".into()
    }
    pub fn detail_path() -> String {
        "/api/products".into()
    }
    pub fn categories_path() -> String {
        "/api/categories".into()
    }
    pub fn page_size() -> u32 {
        crate::models::DEFAULT_PAGE_SIZE
    }
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.catalog.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_probe_timeout() {
        let mut config = Config::default();
        config.catalog.probe_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unbounded_retries() {
        let mut config = Config::default();
        config.catalog.primary_retries = MAX_PRIMARY_RETRIES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            base_url = "https://shop.example.com"
            health_ttl_secs = 30

            [routing]
            mode = "secondary"

            [[category_display]]
            name = "Electronics"
            icon = "cpu"
            color_theme = "blue"
            featured = true
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.base_url, "https://shop.example.com");
        assert_eq!(config.catalog.probe_timeout(), Duration::from_millis(3000));
        assert_eq!(config.catalog.health_ttl(), Some(Duration::from_secs(30)));
        assert_eq!(config.routing.mode, RoutingMode::Secondary);
        assert_eq!(config.category_display.len(), 1);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_ttl_means_no_expiry() {
        assert_eq!(CatalogConfig::default().health_ttl(), None);
    }
}
