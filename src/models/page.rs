// src/models/page.rs

//! Response envelope and paginated result page.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Standard response wrapper returned by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Unwrap the payload, treating `success: false` or a missing payload
    /// as a malformed response.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(AppError::malformed(
                self.message
                    .unwrap_or_else(|| "envelope reported success=false".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AppError::malformed("envelope has no data"))
    }
}

/// One server-provided page of results. Page numbers are 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    pub first: bool,
    pub last: bool,
    pub number_of_elements: u32,
}

impl<T> ResultPage<T> {
    /// Cut page `number` out of an already filtered and ordered list.
    pub fn from_items(items: Vec<T>, number: u32, size: u32) -> Self {
        let size = size.max(1);
        let total_elements = items.len() as u64;
        let total_pages = total_elements.div_ceil(u64::from(size)) as u32;

        let start = (number as usize).saturating_mul(size as usize);
        let content: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(size as usize)
            .collect();

        Self {
            number_of_elements: content.len() as u32,
            content,
            total_elements,
            total_pages,
            size,
            number,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
        }
    }

    /// Whether a following page exists for the criteria that produced this one.
    pub fn has_next(&self) -> bool {
        !self.last && self.number.saturating_add(1) < self.total_pages
    }

    /// Check the page is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_elements as usize != self.content.len() {
            return Err(AppError::malformed(format!(
                "numberOfElements={} but content has {} items",
                self.number_of_elements,
                self.content.len()
            )));
        }
        if !self.last && self.total_pages > 0 && self.number >= self.total_pages {
            return Err(AppError::malformed(format!(
                "page {} is not last but only {} pages exist",
                self.number, self.total_pages
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_slices_pages() {
        let items: Vec<u32> = (0..29).collect();

        let first = ResultPage::from_items(items.clone(), 0, 12);
        assert_eq!(first.content.len(), 12);
        assert_eq!(first.total_pages, 3);
        assert!(first.first);
        assert!(first.has_next());

        let last = ResultPage::from_items(items, 2, 12);
        assert_eq!(last.content, (24..29).collect::<Vec<_>>());
        assert_eq!(last.number_of_elements, 5);
        assert!(last.last);
        assert!(!last.has_next());
    }

    #[test]
    fn test_from_items_empty() {
        let page: ResultPage<u32> = ResultPage::from_items(Vec::new(), 0, 12);
        assert_eq!(page.total_pages, 0);
        assert!(page.first);
        assert!(page.last);
        assert!(!page.has_next());
    }

    #[test]
    fn test_has_next_respects_total_pages_even_if_not_last() {
        let page = ResultPage {
            content: vec![1],
            total_elements: 1,
            total_pages: 1,
            size: 12,
            number: 0,
            first: true,
            last: false,
            number_of_elements: 1,
        };
        assert!(!page.has_next());
    }

    #[test]
    fn test_envelope_parsing() {
        let json = r#"{
            "success": true,
            "data": {
                "content": [1, 2],
                "totalElements": 2,
                "totalPages": 1,
                "size": 12,
                "number": 0,
                "first": true,
                "last": true,
                "numberOfElements": 2
            }
        }"#;
        let envelope: ApiEnvelope<ResultPage<u32>> = serde_json::from_str(json).unwrap();
        let page = envelope.into_data().unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_envelope_failure_is_malformed() {
        let json = r#"{ "success": false, "message": "index offline" }"#;
        let envelope: ApiEnvelope<ResultPage<u32>> = serde_json::from_str(json).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, AppError::Malformed(ref m) if m == "index offline"));
    }

    #[test]
    fn test_page_past_the_end_is_empty_and_last() {
        let page = ResultPage::from_items(vec![1, 2, 3], u32::MAX, 12);
        assert!(page.content.is_empty());
        assert!(page.last);
        assert!(!page.has_next());
        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_number_beyond_total_pages() {
        let page = ResultPage {
            content: vec![1],
            total_elements: 1,
            total_pages: 1,
            size: 12,
            number: u32::MAX,
            first: false,
            last: false,
            number_of_elements: 1,
        };
        assert!(!page.has_next());
        assert!(matches!(page.validate(), Err(AppError::Malformed(_))));
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let mut page = ResultPage::from_items(vec![1, 2, 3], 0, 12);
        page.number_of_elements = 5;
        assert!(page.validate().is_err());
    }
}
