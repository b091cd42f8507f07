// src/lib.rs

//! Storefront catalog retrieval library.
//!
//! Sits between the UI and the catalog service: routes calls to the live
//! service or a local fallback dataset, accumulates paginated search
//! results per criteria, and rebuilds the category tree.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;
