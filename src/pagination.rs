use axum::http::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use utoipa::ToSchema;

use crate::query::QueryParameters;

pub const PAGINATION_HEADER: &str = "X-Pagination";

/// Paging facts of a list response, sent as JSON in the `X-Pagination` header.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: f64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginationMetadata {
    #[must_use]
    pub fn new(params: &QueryParameters, total_count: u64) -> Self {
        Self {
            total_count,
            page_size: params.page_count,
            current_page: params.page,
            total_pages: params.total_pages(total_count),
            has_next: params.has_next(total_count),
            has_previous: params.has_previous(),
        }
    }
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// Build the `Content-Range` header value, e.g. `compositions 0-9/42`.
///
/// A page holding no rows has no range and is reported as `compositions */42`.
#[must_use]
pub fn content_range(offset: u64, limit: u64, total_count: u64, resource_name: &str) -> String {
    let safe_name = sanitize_resource_name(resource_name);
    if limit == 0 || offset >= total_count {
        return format!("{safe_name} */{total_count}");
    }
    let last = offset.saturating_add(limit - 1).min(total_count - 1);
    format!("{safe_name} {offset}-{last}/{total_count}")
}

/// Response headers of a list request: `Content-Range` and `X-Pagination`.
#[must_use]
pub fn pagination_headers(params: &QueryParameters, total_count: u64, resource_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let range = content_range(params.offset(), params.limit(), total_count, resource_name);
    if let Ok(value) = HeaderValue::from_str(&range) {
        headers.insert("Content-Range", value);
    }

    let metadata = PaginationMetadata::new(params, total_count);
    match serde_json::to_string(&metadata) {
        Ok(json) => {
            if let Ok(value) = HeaderValue::from_str(&json) {
                headers.insert(PAGINATION_HEADER, value);
            }
        }
        Err(err) => tracing::warn!(error = %err, "failed to serialize pagination metadata"),
    }

    headers
}
