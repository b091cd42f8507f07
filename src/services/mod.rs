//! Service layer for the catalog retrieval layer.
//!
//! This module contains the business logic for:
//! - Source routing and fallback (`SourceSelector`, `SourceHealth`)
//! - Paginated search sessions (`PageAccumulator`, `CatalogBrowser`)
//! - Category tree building (`CategoryReconstructor`)

mod accumulator;
mod browser;
mod categories;
mod health;
mod selector;

pub use accumulator::{AccumulatorState, FetchOutcome, PageAccumulator, PageSource, flatten};
pub use browser::CatalogBrowser;
pub use categories::{
    CategoryReconstructor, DisplayTable, count_nodes, featured_first, find, path_to,
};
pub use health::{HealthSnapshot, ProbeOutcome, SourceHealth};
pub use selector::{DEFAULT_PROBE_TIMEOUT, SourceKind, SourceSelector};
