//! Storage-client seam.
//!
//! [`StoreClient`] is the single trait a storage backend must implement;
//! the CRUD services are written against it so the data layer can be
//! re-platformed without touching callers. All operations are async. Rows
//! cross the seam as JSON objects and are decoded into typed entities by
//! the service layer.

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::query::SortOrder;

/// Storage-level error type. Converted into the public taxonomy by the
/// classifier before reaching callers.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backend is not configured (missing or placeholder credentials);
    /// operations fail fast without attempting network I/O.
    #[error("storage backend is not configured: {0}")]
    NotConfigured(String),

    #[error("network error: {0}")]
    Network(String),

    /// A non-success response from the backend.
    #[error("backend responded {status}: {message}")]
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("row not found in {table}: {id}")]
    NotFound { table: String, id: String },

    #[error("conflict in {table}: {message}")]
    Conflict { table: String, message: String },

    #[error("failed to decode row: {0}")]
    Decode(String),
}

/// Case-insensitive substring search OR'd across several columns.
#[derive(Debug, Clone)]
pub struct SearchClause {
    pub term: String,
    pub fields: Vec<String>,
}

/// Closed or half-open range constraint on one column (inclusive bounds).
#[derive(Debug, Clone)]
pub struct RangeClause {
    pub column: String,
    pub min: Option<Value>,
    pub max: Option<Value>,
}

/// A read query against one table: exact-match filters (AND), an optional
/// OR'd search clause, inclusive range constraints, one sort key, and
/// offset/limit pagination.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    pub filters: Vec<(String, Value)>,
    pub search: Option<SearchClause>,
    pub ranges: Vec<RangeClause>,
    pub order: Option<(String, SortOrder)>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Request an exact row count alongside the page.
    pub count: bool,
}

impl SelectQuery {
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn between(
        mut self,
        column: impl Into<String>,
        min: Option<Value>,
        max: Option<Value>,
    ) -> Self {
        self.ranges.push(RangeClause {
            column: column.into(),
            min,
            max,
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order = Some((column.into(), order));
        self
    }

    pub fn range(mut self, offset: u64, limit: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }
}

/// Rows plus the exact count when one was requested.
#[derive(Debug, Clone, Default)]
pub struct SelectResult {
    pub rows: Vec<Value>,
    pub count: Option<u64>,
}

/// The backend seam. Implemented by the hosted REST backend and by the
/// in-memory local backend.
pub trait StoreClient: Send + Sync {
    fn select(
        &self,
        table: &str,
        query: SelectQuery,
    ) -> impl Future<Output = Result<SelectResult, StoreError>> + Send;

    /// Insert one row and return it as stored (including backend-assigned
    /// columns).
    fn insert(
        &self,
        table: &str,
        row: Value,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send;

    /// Partial update by primary id; returns the updated row.
    fn update(
        &self,
        table: &str,
        id_column: &str,
        id: &Value,
        patch: Value,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send;

    /// Hard delete by primary id; returns the number of rows removed.
    fn delete(
        &self,
        table: &str,
        id_column: &str,
        id: &Value,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
