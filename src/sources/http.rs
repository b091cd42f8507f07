// src/sources/http.rs

//! Remote catalog service client (primary source).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    ApiEnvelope, CatalogConfig, CategoryRecord, ProductRecord, ResultPage, SearchCriteria,
};
use crate::sources::CatalogSource;
use crate::utils::{endpoint, http, with_segment};

/// Primary source backed by the catalog service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    search_url: Url,
    detail_url: Url,
    categories_url: Url,
    health_url: Url,
}

impl HttpSource {
    /// Create a client for the service described by `config`.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Self::with_client(config, http::create_client(config)?)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(config: &CatalogConfig, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            search_url: endpoint(&config.base_url, &config.search_path)?,
            detail_url: endpoint(&config.base_url, &config.detail_path)?,
            categories_url: endpoint(&config.base_url, &config.categories_path)?,
            health_url: endpoint(&config.base_url, &config.health_path)?,
        })
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// GET `url` and decode the body as JSON, mapping non-2xx to `AppError::Status`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::malformed(format!("{url}: {e}")))
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn name(&self) -> &str {
        "primary"
    }

    async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<ResultPage<ProductRecord>> {
        let query = criteria.to_query(page);
        let envelope: ApiEnvelope<ResultPage<ProductRecord>> =
            self.get_json(self.search_url.clone(), &query).await?;

        let page = envelope.into_data()?;
        page.validate()?;
        Ok(page)
    }

    async fn get_detail(&self, id: i64) -> Result<ProductRecord> {
        let url = with_segment(&self.detail_url, &id.to_string())?;
        match self.get_json::<ApiEnvelope<ProductRecord>>(url, &[]).await {
            Ok(envelope) => envelope.into_data(),
            Err(AppError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(AppError::not_found(id))
            }
            Err(e) => Err(e),
        }
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.get_json(self.categories_url.clone(), &[]).await
    }

    async fn probe(&self) -> Result<()> {
        let response = self.client.get(self.health_url.clone()).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::Status {
                status: status.as_u16(),
                url: self.health_url.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_config() {
        let config = CatalogConfig {
            base_url: "https://shop.example.com/".to_string(),
            ..CatalogConfig::default()
        };
        let source = HttpSource::new(&config).unwrap();

        assert_eq!(
            source.health_url().as_str(),
            "https://shop.example.com/actuator/health"
        );
        assert_eq!(
            source.search_url.as_str(),
            "https://shop.example.com/api/products/search"
        );
        assert_eq!(
            source.categories_url.as_str(),
            "https://shop.example.com/api/categories"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = CatalogConfig {
            base_url: "::nope::".to_string(),
            ..CatalogConfig::default()
        };
        assert!(HttpSource::new(&config).is_err());
    }
}
