// src/utils/http.rs

//! HTTP client utilities.

use reqwest::Client;

use crate::error::Result;
use crate::models::CatalogConfig;

/// Create a configured asynchronous HTTP client for the catalog service.
pub fn create_client(config: &CatalogConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}
