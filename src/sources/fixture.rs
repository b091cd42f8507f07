// src/sources/fixture.rs

//! Deterministic in-memory catalog (secondary source).
//!
//! Answers the same requests as the remote service from a fixed dataset:
//! filtering, ordering and paging are all computed locally, so the same
//! criteria and page always produce the same result. A category filter
//! matches the category itself and every category below it.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{
    CatalogRef, CategoryRecord, CategoryRef, Condition, ConditionGrade, ProductRecord,
    ProductStatus, ResultPage, SearchCriteria, SortDirection, SortField,
};
use crate::sources::CatalogSource;

/// Dataset file layout: `{ "products": [...], "categories": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FixtureDataset {
    #[serde(default)]
    pub products: Vec<ProductRecord>,

    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
}

/// Secondary source serving a fixed dataset.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dataset: FixtureDataset,
}

impl FixtureSource {
    pub fn new(dataset: FixtureDataset) -> Self {
        Self { dataset }
    }

    /// Source over the built-in sample catalog.
    pub fn builtin() -> Self {
        Self::new(builtin::dataset())
    }

    /// Load a dataset from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let dataset: FixtureDataset = serde_json::from_slice(&bytes)?;
        log::info!(
            "Loaded fixture dataset from {} ({} products, {} categories)",
            path.display(),
            dataset.products.len(),
            dataset.categories.len()
        );
        Ok(Self::new(dataset))
    }

    pub fn dataset(&self) -> &FixtureDataset {
        &self.dataset
    }

    /// `category_id` plus all of its descendants in the dataset.
    fn category_scope(&self, category_id: i64) -> HashSet<i64> {
        let mut scope = HashSet::from([category_id]);
        let mut frontier = vec![category_id];
        while let Some(parent) = frontier.pop() {
            for child in self
                .dataset
                .categories
                .iter()
                .filter(|c| c.parent_id == Some(parent))
            {
                if scope.insert(child.id) {
                    frontier.push(child.id);
                }
            }
        }
        scope
    }

    fn matches(
        criteria: &SearchCriteria,
        scope: Option<&HashSet<i64>>,
        product: &ProductRecord,
    ) -> bool {
        if let Some(keyword) = &criteria.keyword {
            if !product
                .name
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }
        if scope.is_some_and(|ids| !ids.contains(&product.category_id())) {
            return false;
        }
        if product.condition != criteria.condition {
            return false;
        }
        if criteria
            .condition_grade
            .is_some_and(|grade| product.condition_grade != Some(grade))
        {
            return false;
        }
        if criteria
            .price_range
            .is_some_and(|range| !range.contains(product.price))
        {
            return false;
        }
        if criteria
            .status
            .is_some_and(|status| status != product.status)
        {
            return false;
        }
        true
    }

    fn compare(field: SortField, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Name => a.name.cmp(&b.name),
            SortField::StockQuantity => a.stock_quantity.cmp(&b.stock_quantity),
        }
    }
}

#[async_trait]
impl CatalogSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<ResultPage<ProductRecord>> {
        let scope = criteria.category_id.map(|id| self.category_scope(id));
        let mut hits: Vec<ProductRecord> = self
            .dataset
            .products
            .iter()
            .filter(|p| Self::matches(criteria, scope.as_ref(), p))
            .cloned()
            .collect();

        // Ties break on id so equal sort keys never reorder between calls.
        hits.sort_by(|a, b| {
            let primary = Self::compare(criteria.sort_field, a, b);
            let primary = match criteria.sort_direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        Ok(ResultPage::from_items(hits, page, criteria.page_size))
    }

    async fn get_detail(&self, id: i64) -> Result<ProductRecord> {
        self.dataset
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(id))
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        Ok(self.dataset.categories.clone())
    }
}

/// Built-in sample catalog.
mod builtin {
    use super::*;

    /// Epoch seconds of the first sample listing; each later id is one day newer.
    const BASE_CREATED_AT: i64 = 1_767_225_600;
    const DAY_SECS: i64 = 86_400;

    type Row = (
        &'static str,
        i64,
        f64,
        Condition,
        Option<ConditionGrade>,
        i64,
    );

    const PRODUCTS: &[Row] = &[
        ("Galaxy S24 128GB", 2, 899_000.0, Condition::New, None, 14),
        ("iPhone 14 Pro", 2, 720_000.0, Condition::Used, Some(ConditionGrade::A), 2),
        ("Pixel 8", 2, 610_000.0, Condition::Used, Some(ConditionGrade::B), 1),
        ("Phone Case Clear", 2, 12_000.0, Condition::New, None, 120),
        ("X-T5 Mirrorless Camera", 3, 2_190_000.0, Condition::New, None, 3),
        ("EOS 200D Camera", 3, 380_000.0, Condition::Used, Some(ConditionGrade::B), 1),
        ("35mm Prime Lens", 3, 540_000.0, Condition::Used, Some(ConditionGrade::S), 1),
        ("Camera Strap Leather", 3, 45_000.0, Condition::New, None, 40),
        ("MacBook Air M2", 4, 1_390_000.0, Condition::New, None, 6),
        ("ThinkPad X1 Carbon", 4, 950_000.0, Condition::Used, Some(ConditionGrade::A), 2),
        ("Gaming Laptop 16", 4, 1_780_000.0, Condition::New, None, 4),
        ("Laptop Stand Aluminum", 4, 39_000.0, Condition::New, None, 75),
        ("Running Shoes 270", 6, 129_000.0, Condition::New, None, 22),
        ("Leather Boots", 6, 88_000.0, Condition::Used, Some(ConditionGrade::C), 1),
        ("Canvas Sneakers", 6, 59_000.0, Condition::New, None, 31),
        ("Canvas Tote Bag", 7, 25_000.0, Condition::New, None, 54),
        ("Leather Backpack", 7, 168_000.0, Condition::Used, Some(ConditionGrade::A), 1),
        ("Travel Duffel 40L", 7, 74_000.0, Condition::New, None, 12),
        ("Cast Iron Skillet", 9, 48_000.0, Condition::New, None, 18),
        ("Pour-over Coffee Set", 9, 36_000.0, Condition::New, None, 26),
        ("Stand Mixer", 9, 310_000.0, Condition::Used, Some(ConditionGrade::B), 1),
        ("Oak Dining Table", 10, 520_000.0, Condition::New, None, 2),
        ("Velvet Armchair", 10, 230_000.0, Condition::Used, Some(ConditionGrade::A), 1),
        ("Floor Lamp Linen", 10, 67_000.0, Condition::New, None, 9),
        ("Rust in Action", 11, 42_000.0, Condition::New, None, 15),
        ("Designing Data-Intensive Applications", 11, 38_000.0, Condition::Used, Some(ConditionGrade::S), 3),
        ("Yoga Mat 6mm", 12, 29_000.0, Condition::New, None, 44),
        ("Adjustable Dumbbells", 12, 189_000.0, Condition::Used, Some(ConditionGrade::B), 1),
        ("Two-person Tent", 13, 159_000.0, Condition::New, None, 7),
        ("Camping Lantern", 13, 21_000.0, Condition::New, None, 63),
    ];

    fn categories() -> Vec<CategoryRecord> {
        vec![
            CategoryRecord::root(1, "Electronics"),
            CategoryRecord::child(2, "Phones", 1, 1),
            CategoryRecord::child(3, "Cameras", 1, 1),
            CategoryRecord::child(4, "Laptops", 1, 1),
            CategoryRecord::root(5, "Fashion"),
            CategoryRecord::child(6, "Shoes", 5, 1),
            CategoryRecord::child(7, "Bags", 5, 1),
            CategoryRecord::root(8, "Home & Living"),
            CategoryRecord::child(9, "Kitchen", 8, 1),
            CategoryRecord::child(10, "Furniture", 8, 1),
            CategoryRecord::root(11, "Books"),
            CategoryRecord::root(12, "Sports"),
            CategoryRecord::child(13, "Camping", 12, 1),
        ]
    }

    pub(super) fn dataset() -> FixtureDataset {
        let categories = categories();

        let products = PRODUCTS
            .iter()
            .zip(1_i64..)
            .map(|(&(name, category_id, price, condition, grade, stock), id)| {
                let category_name = categories
                    .iter()
                    .find(|c| c.id == category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();

                ProductRecord {
                    id,
                    name: name.to_string(),
                    catalog: CatalogRef {
                        id: Some(100 + id),
                        category: CategoryRef {
                            id: category_id,
                            name: category_name,
                        },
                    },
                    price,
                    condition,
                    condition_grade: grade,
                    stock_quantity: stock,
                    status: ProductStatus::Active,
                    attributes: Default::default(),
                    created_at: DateTime::from_timestamp(BASE_CREATED_AT + id * DAY_SECS, 0),
                }
            })
            .collect();

        FixtureDataset {
            products,
            categories,
        }
    }
}
