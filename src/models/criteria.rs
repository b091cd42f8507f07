// src/models/criteria.rs

//! Search criteria snapshot and its query-string encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ProductStatus;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Item condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    #[default]
    New,
    Used,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "NEW",
            Condition::Used => "USED",
        }
    }
}

/// Grade of a used item, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionGrade {
    S,
    A,
    B,
    C,
}

impl ConditionGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionGrade::S => "S",
            ConditionGrade::A => "A",
            ConditionGrade::B => "B",
            ConditionGrade::C => "C",
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    /// Bounds given in either order are stored as `min <= max`.
    pub fn new(a: u64, b: u64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min as f64 && price <= self.max as f64
    }
}

/// Field the backend sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
    Name,
    StockQuantity,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::Price => "price",
            SortField::Name => "name",
            SortField::StockQuantity => "stockQuantity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Immutable set of search parameters identifying one scroll session.
///
/// Equality over every field is the reset key: two criteria that compare
/// equal share a session, anything else starts a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub keyword: Option<String>,
    pub category_id: Option<i64>,
    pub condition: Condition,
    pub condition_grade: Option<ConditionGrade>,
    pub price_range: Option<PriceRange>,
    pub status: Option<ProductStatus>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_size: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            keyword: None,
            category_id: None,
            condition: Condition::default(),
            condition_grade: None,
            price_range: None,
            status: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text keyword. Blank input clears it.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        self.keyword = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_grade(mut self, grade: ConditionGrade) -> Self {
        self.condition_grade = Some(grade);
        self
    }

    pub fn with_price_range(mut self, min: u64, max: u64) -> Self {
        self.price_range = Some(PriceRange::new(min, max));
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Encode as request query parameters for the given 0-based page.
    ///
    /// Absent optional fields are omitted rather than sent empty.
    pub fn to_query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(11);

        if let Some(keyword) = &self.keyword {
            params.push(("keyword", keyword.clone()));
        }
        if let Some(category_id) = self.category_id {
            params.push(("categoryId", category_id.to_string()));
        }
        params.push(("condition", self.condition.as_str().to_string()));
        if let Some(grade) = self.condition_grade {
            params.push(("conditionGrade", grade.as_str().to_string()));
        }
        if let Some(range) = self.price_range {
            params.push(("minPrice", range.min.to_string()));
            params.push(("maxPrice", range.max.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        params.push(("pageNumber", page.to_string()));
        params.push(("pageSize", self.page_size.to_string()));
        params.push(("sort", self.sort_field.as_str().to_string()));
        params.push(("sortDirection", self.sort_direction.as_str().to_string()));

        params
    }
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "keyword={:?} category={:?} condition={} sort={} {} size={}",
            self.keyword.as_deref().unwrap_or(""),
            self.category_id,
            self.condition.as_str(),
            self.sort_field.as_str(),
            self.sort_direction.as_str(),
            self.page_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_defaults() {
        let criteria = SearchCriteria::new();
        assert_eq!(criteria.condition, Condition::New);
        assert_eq!(criteria.sort_field, SortField::CreatedAt);
        assert_eq!(criteria.sort_direction, SortDirection::Desc);
        assert_eq!(criteria.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_equality_is_fieldwise() {
        let a = SearchCriteria::new().with_keyword("lamp");
        let b = SearchCriteria::new().with_keyword("lamp");
        assert_eq!(a, b);

        let c = b.clone().with_page_size(24);
        assert_ne!(a, c);

        let d = a.clone().with_grade(ConditionGrade::A);
        assert_ne!(a, d);
    }

    #[test]
    fn test_blank_keyword_is_cleared() {
        let criteria = SearchCriteria::new().with_keyword("   ");
        assert_eq!(criteria.keyword, None);
        assert_eq!(criteria, SearchCriteria::new());
    }

    #[test]
    fn test_query_omits_absent_fields() {
        let params = SearchCriteria::new().to_query(0);
        assert_eq!(param(&params, "keyword"), None);
        assert_eq!(param(&params, "categoryId"), None);
        assert_eq!(param(&params, "minPrice"), None);
        assert_eq!(param(&params, "condition"), Some("NEW"));
        assert_eq!(param(&params, "pageNumber"), Some("0"));
        assert_eq!(param(&params, "pageSize"), Some("12"));
        assert_eq!(param(&params, "sort"), Some("createdAt"));
        assert_eq!(param(&params, "sortDirection"), Some("DESC"));
    }

    #[test]
    fn test_query_full() {
        let params = SearchCriteria::new()
            .with_keyword(" camera ")
            .with_category(4)
            .with_condition(Condition::Used)
            .with_grade(ConditionGrade::B)
            .with_price_range(1000, 50000)
            .with_status(ProductStatus::Active)
            .sorted_by(SortField::Price, SortDirection::Asc)
            .to_query(3);

        assert_eq!(param(&params, "keyword"), Some("camera"));
        assert_eq!(param(&params, "categoryId"), Some("4"));
        assert_eq!(param(&params, "condition"), Some("USED"));
        assert_eq!(param(&params, "conditionGrade"), Some("B"));
        assert_eq!(param(&params, "minPrice"), Some("1000"));
        assert_eq!(param(&params, "maxPrice"), Some("50000"));
        assert_eq!(param(&params, "status"), Some("ACTIVE"));
        assert_eq!(param(&params, "pageNumber"), Some("3"));
        assert_eq!(param(&params, "sort"), Some("price"));
        assert_eq!(param(&params, "sortDirection"), Some("ASC"));
    }

    #[test]
    fn test_price_range_bounds_are_ordered() {
        let criteria = SearchCriteria::new().with_price_range(50_000, 1_000);
        assert_eq!(criteria.price_range, Some(PriceRange::new(1_000, 50_000)));
        assert_eq!(criteria.price_range.map(|r| r.min), Some(1_000));

        let range = criteria.price_range.unwrap();
        assert!(range.contains(25_000.0));
        assert!(!range.contains(60_000.0));
    }
}
