// src/config.rs

//! Configuration loading and wiring utilities.
//!
//! This module turns a `Config` into ready-to-use services: the source
//! selector over the remote service and the fallback dataset, and the
//! category reconstructor with any configured display overrides.

use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::{CategoryReconstructor, DisplayTable, SourceHealth, SourceSelector};
use crate::sources::{CatalogSource, FixtureSource, HttpSource};

/// Load configuration from a TOML file.
///
/// Falls back to defaults if loading fails, then validates the result.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path);
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;
    Ok(config)
}

/// Build the fallback source: the configured dataset file, or the built-in one.
pub async fn build_fixture(config: &Config) -> Result<FixtureSource> {
    match config.fixture.path.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => FixtureSource::load(path).await,
        None => Ok(FixtureSource::builtin()),
    }
}

/// Build a selector over the remote service and the fallback dataset.
pub async fn build_selector(config: &Config) -> Result<SourceSelector> {
    let primary: Arc<dyn CatalogSource> = Arc::new(HttpSource::new(&config.catalog)?);
    let secondary: Arc<dyn CatalogSource> = Arc::new(build_fixture(config).await?);
    let health = Arc::new(SourceHealth::with_ttl(config.catalog.health_ttl()));

    Ok(SourceSelector::from_config(
        config, primary, secondary, health,
    ))
}

/// Build a category reconstructor with configured display overrides applied.
pub fn build_reconstructor(config: &Config) -> CategoryReconstructor {
    CategoryReconstructor::new(DisplayTable::builtin().with_overrides(&config.category_display))
}
