//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::{AppError, Result};

/// Build a service endpoint from a base URL and an absolute API path.
///
/// Any path prefix on the base is kept, so `http://host/shop` + `/api/x`
/// gives `http://host/shop/api/x`.
pub fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

/// Append one path segment (e.g. a record id) to an endpoint.
pub fn with_segment(url: &Url, segment: &str) -> Result<Url> {
    let mut url = url.clone();
    {
        let Ok(mut segments) = url.path_segments_mut() else {
            return Err(AppError::config("endpoint URL cannot be a base"));
        };
        segments.pop_if_empty().push(segment);
    }
    Ok(url)
}
