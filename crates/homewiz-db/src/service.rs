//! Generic CRUD service.
//!
//! One [`EntityService`] per entity composes the query cache and the
//! retry executor over the storage seam. Every operation resolves to an
//! envelope; raw backend errors never escape past this boundary, and
//! operations never panic.
//!
//! Caching is read-side only and invalidation is coarse: any write blows
//! away the whole table namespace. Entity-specific one-off queries go
//! through the raw helpers and bypass the cache entirely.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use homewiz_core::error::{classify, EnhancedError, ErrorCategory, ErrorLog};
use homewiz_core::models::{id_to_value, Entity};
use homewiz_core::query::ListOptions;
use homewiz_core::response::{DatabaseResponse, ListResponse};
use homewiz_core::store::{SelectQuery, SelectResult, StoreClient, StoreError};

use crate::cache::QueryCache;
use crate::retry::RetryExecutor;

/// Cached shape of one list page.
#[derive(Deserialize)]
struct CachedPage {
    rows: Vec<Value>,
    count: Option<u64>,
}

/// Generic CRUD operations for one entity type.
pub struct EntityService<T: Entity, S: StoreClient + 'static> {
    store: Arc<S>,
    cache: Arc<QueryCache>,
    retry: Arc<RetryExecutor>,
    error_log: Arc<ErrorLog>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity, S: StoreClient + 'static> Clone for EntityService<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            retry: Arc::clone(&self.retry),
            error_log: Arc::clone(&self.error_log),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity, S: StoreClient + 'static> EntityService<T, S> {
    pub fn new(
        store: Arc<S>,
        cache: Arc<QueryCache>,
        retry: Arc<RetryExecutor>,
        error_log: Arc<ErrorLog>,
    ) -> Self {
        Self {
            store,
            cache,
            retry,
            error_log,
            _entity: PhantomData,
        }
    }

    fn label(op: &str) -> String {
        format!("{}.{op}", T::TABLE)
    }

    /// Insert a record; the envelope carries the row as stored, including
    /// backend-assigned columns.
    pub async fn create(&self, input: T::Create) -> DatabaseResponse<T> {
        let label = Self::label("create");
        let row = match serde_json::to_value(&input) {
            Ok(row @ Value::Object(_)) => row,
            _ => return DatabaseResponse::failure(self.payload_error(&label)),
        };

        match self.raw_insert(&label, row).await {
            Ok(stored) => match serde_json::from_value::<T>(stored) {
                Ok(record) => {
                    self.cache.invalidate(Some(T::TABLE));
                    info!(table = T::TABLE, id = %record.id(), "created record");
                    DatabaseResponse::ok_with_message(record, "created successfully")
                }
                Err(err) => DatabaseResponse::failure(self.decode_error(&label, &err)),
            },
            Err(err) => DatabaseResponse::failure(err),
        }
    }

    /// Cache-first single-record read, keyed `table:id`.
    pub async fn get_by_id(&self, id: &T::Id) -> DatabaseResponse<T> {
        let label = Self::label("get_by_id");
        let key = QueryCache::key(T::TABLE, &id.to_string());

        if let Some(cached) = self.cache.get(&key) {
            if let Ok(record) = serde_json::from_value::<T>(cached) {
                debug!(table = T::TABLE, id = %id, "cache hit");
                return DatabaseResponse::ok_with_message(record, "from cache");
            }
            // Undecodable entry; drop it and fall through to the store.
            self.cache.invalidate(Some(key.as_str()));
        }

        let query = SelectQuery::default()
            .filter(T::ID_COLUMN, id_to_value::<T>(id))
            .range(0, 1);
        match self.raw_select_from(T::TABLE, &label, query).await {
            Ok(result) => match result.rows.into_iter().next() {
                Some(row) => {
                    self.cache.set(key, row.clone());
                    match serde_json::from_value::<T>(row) {
                        Ok(record) => DatabaseResponse::ok(record),
                        Err(err) => DatabaseResponse::failure(self.decode_error(&label, &err)),
                    }
                }
                None => {
                    let err = classify(
                        &StoreError::NotFound {
                            table: T::TABLE.to_string(),
                            id: id.to_string(),
                        },
                        &label,
                    );
                    self.error_log.record(&err);
                    DatabaseResponse::failure(err)
                }
            },
            Err(err) => DatabaseResponse::failure(err),
        }
    }

    /// Partial update. Stamps the entity's write-stamp column when it has
    /// one, then invalidates the table namespace.
    pub async fn update(&self, id: &T::Id, patch: T::Update) -> DatabaseResponse<T> {
        let label = Self::label("update");
        let mut object = match serde_json::to_value(&patch) {
            Ok(Value::Object(object)) => object,
            _ => return DatabaseResponse::failure(self.payload_error(&label)),
        };
        if let Some(column) = T::WRITE_STAMP {
            object.insert(column.to_string(), T::write_stamp_value());
        }

        match self
            .raw_update(&label, id_to_value::<T>(id), Value::Object(object))
            .await
        {
            Ok(stored) => match serde_json::from_value::<T>(stored) {
                Ok(record) => {
                    self.cache.invalidate(Some(T::TABLE));
                    debug!(table = T::TABLE, id = %id, "updated record");
                    DatabaseResponse::ok_with_message(record, "updated successfully")
                }
                Err(err) => DatabaseResponse::failure(self.decode_error(&label, &err)),
            },
            Err(err) => DatabaseResponse::failure(err),
        }
    }

    /// Hard delete by id. Dependents are neither checked nor removed.
    pub async fn delete(&self, id: &T::Id) -> DatabaseResponse<bool> {
        let label = Self::label("delete");
        match self.raw_delete(&label, id_to_value::<T>(id)).await {
            Ok(removed) => {
                self.cache.invalidate(Some(T::TABLE));
                let deleted = removed > 0;
                DatabaseResponse::ok_with_message(
                    deleted,
                    if deleted {
                        "deleted successfully"
                    } else {
                        "no matching record"
                    },
                )
            }
            Err(err) => DatabaseResponse::failure(err),
        }
    }

    /// Filtered, searched, sorted, paginated listing. Every distinct
    /// options shape is cached independently under its serialized
    /// signature.
    pub async fn list(&self, options: ListOptions) -> ListResponse<T> {
        let label = Self::label("list");
        let key = QueryCache::key(T::TABLE, &format!("list:{}", options.cache_signature()));

        if let Some(cached) = self.cache.get(&key) {
            if let Ok(page) = serde_json::from_value::<CachedPage>(cached) {
                let decoded: Result<Vec<T>, _> = page
                    .rows
                    .into_iter()
                    .map(serde_json::from_value::<T>)
                    .collect();
                if let Ok(items) = decoded {
                    debug!(table = T::TABLE, "list cache hit");
                    return ListResponse::ok_with_message(items, page.count, "from cache");
                }
            }
            self.cache.invalidate(Some(key.as_str()));
        }

        match self
            .raw_select_from(T::TABLE, &label, options.to_select_query())
            .await
        {
            Ok(result) => {
                self.cache
                    .set(key, json!({ "rows": result.rows, "count": result.count }));
                let decoded: Result<Vec<T>, _> = result
                    .rows
                    .into_iter()
                    .map(serde_json::from_value::<T>)
                    .collect();
                match decoded {
                    Ok(items) => ListResponse::ok(items, result.count),
                    Err(err) => ListResponse::failure(self.decode_error(&label, &err)),
                }
            }
            Err(err) => ListResponse::failure(err),
        }
    }

    /// Exact row count for the current table (uncached).
    pub(crate) async fn count(&self, label: &str) -> Result<u64, EnhancedError> {
        let query = SelectQuery {
            count: true,
            limit: Some(1),
            ..SelectQuery::default()
        };
        let result = self.raw_select_from(T::TABLE, label, query).await?;
        Ok(result.count.unwrap_or(result.rows.len() as u64))
    }

    // --- raw helpers -----------------------------------------------------
    //
    // Retry-wrapped storage calls without cache involvement. The
    // entity-specific extension queries build on these.

    pub(crate) async fn raw_select(
        &self,
        label: &str,
        query: SelectQuery,
    ) -> Result<SelectResult, EnhancedError> {
        self.raw_select_from(T::TABLE, label, query).await
    }

    pub(crate) async fn raw_select_from(
        &self,
        table: &'static str,
        label: &str,
        query: SelectQuery,
    ) -> Result<SelectResult, EnhancedError> {
        let store = Arc::clone(&self.store);
        self.retry
            .execute(label, move || {
                let store = Arc::clone(&store);
                let query = query.clone();
                async move { store.select(table, query).await }
            })
            .await
    }

    async fn raw_insert(&self, label: &str, row: Value) -> Result<Value, EnhancedError> {
        let store = Arc::clone(&self.store);
        self.retry
            .execute(label, move || {
                let store = Arc::clone(&store);
                let row = row.clone();
                async move { store.insert(T::TABLE, row).await }
            })
            .await
    }

    async fn raw_update(
        &self,
        label: &str,
        id: Value,
        patch: Value,
    ) -> Result<Value, EnhancedError> {
        let store = Arc::clone(&self.store);
        self.retry
            .execute(label, move || {
                let store = Arc::clone(&store);
                let id = id.clone();
                let patch = patch.clone();
                async move { store.update(T::TABLE, T::ID_COLUMN, &id, patch).await }
            })
            .await
    }

    async fn raw_delete(&self, label: &str, id: Value) -> Result<u64, EnhancedError> {
        let store = Arc::clone(&self.store);
        self.retry
            .execute(label, move || {
                let store = Arc::clone(&store);
                let id = id.clone();
                async move { store.delete(T::TABLE, T::ID_COLUMN, &id).await }
            })
            .await
    }

    pub(crate) fn record_error(&self, err: &EnhancedError) {
        self.error_log.record(err);
    }

    fn payload_error(&self, label: &str) -> EnhancedError {
        let err = EnhancedError::new(
            ErrorCategory::Validation,
            "payload did not serialize to a JSON object",
        )
        .with_operation(label);
        self.error_log.record(&err);
        err
    }

    fn decode_error(&self, label: &str, err: &serde_json::Error) -> EnhancedError {
        let err = classify(&StoreError::Decode(err.to_string()), label);
        self.error_log.record(&err);
        err
    }
}
