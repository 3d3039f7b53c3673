//! List query parameters and the paginated response envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default page size for manager listings.
pub const MANAGER_PAGE_LIMIT: u64 = 10;
/// Default page size for order listings.
pub const ORDER_PAGE_LIMIT: u64 = 25;

/// Inbound pagination parameters; absent values fall back to the
/// directory's defaults (page 1, per-directory limit).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Resolve against a default limit, clamping page to at least 1.
    pub fn resolve(&self, default_limit: u64) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).max(1);
        (page, limit)
    }
}

/// Sort direction. Anything that is not `asc` sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Full order-list query: pagination, sort pairs, and the free-form
/// filter map (key -> one or more raw values).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    /// `(column, direction)` pairs; default sort is `id` descending.
    #[serde(default)]
    pub sort_by: Vec<(String, String)>,
    #[serde(default)]
    pub filter: BTreeMap<String, Vec<String>>,
}

impl OrderListQuery {
    pub fn with_filter(key: &str, values: &[&str]) -> Self {
        let mut filter = BTreeMap::new();
        filter.insert(key.to_string(), values.iter().map(|v| v.to_string()).collect());
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Paginated response envelope shared by both directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, page: u64, limit: u64, total_count: u64) -> Self {
        Self {
            data,
            page,
            limit,
            total_count,
            total_pages: total_count.div_ceil(limit),
        }
    }
}
