// src/models/product.rs

//! Product record as served by the catalog service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Condition, ConditionGrade};

/// Sale status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    SoldOut,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "ACTIVE",
            ProductStatus::Inactive => "INACTIVE",
            ProductStatus::SoldOut => "SOLD_OUT",
        }
    }
}

/// Scalar attribute value (`"color": "black"`, `"weight": 1.2`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Category reference embedded in a product's catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// Catalog entry the product belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub category: CategoryRef,
}

/// A product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub catalog: CatalogRef,
    pub price: f64,
    pub condition: Condition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_grade: Option<ConditionGrade>,

    pub stock_quantity: i64,

    #[serde(default)]
    pub status: ProductStatus,

    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    pub fn category_id(&self) -> i64 {
        self.catalog.category.id
    }

    pub fn category_name(&self) -> &str {
        &self.catalog.category.name
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0 && self.status == ProductStatus::Active
    }
}
