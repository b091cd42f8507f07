// src/models/mod.rs

//! Domain models for the catalog retrieval layer.
//!
//! This module contains all data structures used throughout the crate,
//! organized by their primary purpose.

mod category;
mod config;
mod criteria;
mod page;
mod product;

// Re-export all public types
pub use category::{CategoryNode, CategoryRecord, DisplayAttributes};
pub use config::{
    CatalogConfig, CategoryDisplayEntry, Config, FixtureConfig, LoggingConfig,
    MAX_PRIMARY_RETRIES, RoutingConfig, RoutingMode,
};
pub use criteria::{
    Condition, ConditionGrade, DEFAULT_PAGE_SIZE, PriceRange, SearchCriteria, SortDirection,
    SortField,
};
pub use page::{ApiEnvelope, ResultPage};
pub use product::{AttributeValue, CatalogRef, CategoryRef, ProductRecord, ProductStatus};
