//! List options shared by every CRUD service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{SearchClause, SelectQuery};

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// Options for `list`: pagination, one sort key, exact-match filters
/// (AND'd), and a case-insensitive substring search OR'd across
/// `search_fields`.
///
/// The serialized form doubles as the cache signature, so filters use an
/// ordered map to keep the signature deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOptions {
    /// 1-based page number; defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub filters: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub search_fields: Vec<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(column.into());
        self.sort_order = Some(order);
        self
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>, fields: &[&str]) -> Self {
        self.search = Some(term.into());
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Pagination window: `offset = (page - 1) * limit`.
    pub fn window(&self) -> (u64, u64) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1);
        let page = self.page.unwrap_or(1).max(1);
        ((page - 1) * limit, limit)
    }

    /// Deterministic signature used as the cache key suffix.
    pub fn cache_signature(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "list".to_string())
    }

    /// Lower this into the storage-seam query shape.
    pub fn to_select_query(&self) -> SelectQuery {
        let (offset, limit) = self.window();
        SelectQuery {
            filters: self
                .filters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            search: match (&self.search, self.search_fields.is_empty()) {
                (Some(term), false) => Some(SearchClause {
                    term: term.clone(),
                    fields: self.search_fields.clone(),
                }),
                _ => None,
            },
            order: self
                .sort_by
                .as_ref()
                .map(|col| (col.clone(), self.sort_order.unwrap_or_default())),
            offset: Some(offset),
            limit: Some(limit),
            count: true,
            ..SelectQuery::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_offset_from_one_based_page() {
        let opts = ListOptions::new().page(3).limit(20);
        assert_eq!(opts.window(), (40, 20));
        assert_eq!(ListOptions::new().window(), (0, DEFAULT_PAGE_LIMIT));
    }

    #[test]
    fn cache_signature_is_deterministic_across_filter_insertion_order() {
        let a = ListOptions::new().filter("status", "ACTIVE").filter("city", "SF");
        let b = ListOptions::new().filter("city", "SF").filter("status", "ACTIVE");
        assert_eq!(a.cache_signature(), b.cache_signature());
    }

    #[test]
    fn search_without_fields_is_dropped() {
        let mut opts = ListOptions::new();
        opts.search = Some("Jane".into());
        assert!(opts.to_select_query().search.is_none());
    }
}
