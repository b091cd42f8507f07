//! Catalog data sources.
//!
//! Two interchangeable implementations share one request/response contract:
//! - Primary: `HttpSource`, the remote catalog service
//! - Secondary: `FixtureSource`, a deterministic in-memory dataset
//!
//! `SourceSelector` (in `services`) decides which one serves a call.

pub mod fixture;
pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CategoryRecord, ProductRecord, ResultPage, SearchCriteria};

// Re-export for convenience
pub use fixture::{FixtureDataset, FixtureSource};
pub use http::HttpSource;

/// Trait for catalog backends.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch one 0-based page of products matching `criteria`.
    async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<ResultPage<ProductRecord>>;

    /// Fetch a single product. An absent id is `AppError::NotFound`.
    async fn get_detail(&self, id: i64) -> Result<ProductRecord>;

    /// Fetch the flat, unpaginated category list.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>>;

    /// Liveness check. Sources with no remote dependency are always live.
    async fn probe(&self) -> Result<()> {
        Ok(())
    }
}
