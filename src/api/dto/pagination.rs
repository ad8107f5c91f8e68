//! Pagination and search query parameters for link listing.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::api::dto::link::LinkResponse;
use crate::domain::entities::LinkQuery;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for `GET /urls`.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,

    /// Case-insensitive substring of the URL, code or alias.
    #[serde(default)]
    pub search: Option<String>,
}

impl ListLinksParams {
    /// Validates parameters and converts them to a repository query.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `limit`: 10
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Limit must be between 1 and 100
    ///
    /// Returns the query together with the effective page and limit.
    pub fn into_query(self) -> Result<(LinkQuery, u32, u32), String> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(format!("Limit must be between 1 and {MAX_PAGE_SIZE}"));
        }

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let query = LinkQuery {
            offset: (i64::from(page) - 1) * i64::from(limit),
            limit: i64::from(limit),
            search,
        };

        Ok((query, page, limit))
    }
}

/// Page of an owner's links.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLinksResponse {
    pub urls: Vec<LinkResponse>,
    pub total: i64,
    pub current_page: u32,
    pub total_pages: i64,
}

/// Number of pages needed for `total` items; 0 when there are none.
pub fn total_pages(total: i64, limit: u32) -> i64 {
    let limit = i64::from(limit.max(1));
    (total + limit - 1) / limit
}
