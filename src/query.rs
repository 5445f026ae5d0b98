use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::errors::StoreError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_COUNT: i64 = 10;

/// Query parameters for listing compositions.
///
/// # Sorting
/// `orderBy` names a field, optionally followed by a direction keyword. Only the
/// last whitespace-separated token is inspected for the direction, so both
/// `calories desc` and `calories DESCENDING` sort descending.
///
/// # Filtering
/// `query` keeps compositions whose name contains the text (case-insensitive) or
/// whose calorie count contains it as digits.
///
/// # Pagination
/// `page` is 1-based, `pageCount` is the page size.
#[derive(Clone, Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct QueryParameters {
    /// Field to order by, with an optional trailing `desc`.
    ///
    /// Example: `calories desc`
    #[param(example = "calories desc")]
    pub order_by: Option<String>,
    /// Page number (1-based).
    #[param(example = 1)]
    pub page: i64,
    /// Number of items per page.
    #[param(example = 10)]
    pub page_count: i64,
    /// Free-text filter over name and calories.
    #[param(example = "soup")]
    pub query: Option<String>,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            order_by: None,
            page: DEFAULT_PAGE,
            page_count: DEFAULT_PAGE_COUNT,
            query: None,
        }
    }
}

impl QueryParameters {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn has_next(&self, total_count: u64) -> bool {
        (self.page as f64) < self.total_pages(total_count)
    }

    /// Number of pages needed for `total_count` items, fractional pages rounded up.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_pages(&self, total_count: u64) -> f64 {
        (total_count as f64 / self.page_count as f64).ceil()
    }

    /// Only an absent or empty query counts as "no query"; whitespace is a query.
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.is_empty())
    }

    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.order_by
            .as_deref()
            .filter(|order_by| !order_by.is_empty())
            .and_then(|order_by| order_by.split_whitespace().next_back())
            .is_some_and(|direction| direction.to_lowercase().starts_with("desc"))
    }

    /// The field part of `orderBy`, if any.
    #[must_use]
    pub fn order_field(&self) -> Option<&str> {
        self.order_by.as_deref().and_then(|o| o.split_whitespace().next())
    }

    /// Reject paging values that cannot describe a page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPaging`] when `page` or `pageCount` is below 1.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.page < 1 {
            return Err(StoreError::InvalidPaging(format!(
                "page must be at least 1, got {}",
                self.page
            )));
        }
        if self.page_count < 1 {
            return Err(StoreError::InvalidPaging(format!(
                "pageCount must be at least 1, got {}",
                self.page_count
            )));
        }
        Ok(())
    }

    /// Rows to skip for the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::try_from(self.page_count.saturating_mul(self.page.saturating_sub(1))).unwrap_or(0)
    }

    /// Rows to take for the requested page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::try_from(self.page_count).unwrap_or(0)
    }
}
