//! Explicitly constructed service context.
//!
//! The cache, retry executor, and error log are owned here and shared by
//! every service handed out; nothing in the data layer is a module-level
//! global. Compose one context at application startup and pass it to
//! whatever is handling requests.

use std::sync::Arc;

use homewiz_core::error::ErrorLog;
use homewiz_core::models::building::Building;
use homewiz_core::models::lead::Lead;
use homewiz_core::models::operator::Operator;
use homewiz_core::models::room::Room;
use homewiz_core::models::tenant::Tenant;
use homewiz_core::models::Entity;
use homewiz_core::store::StoreClient;

use crate::cache::{CacheConfig, QueryCache};
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::service::EntityService;
use crate::services::{
    BuildingService, LeadService, OperatorService, RoomService, TenantService,
};

/// Shared state for one data-layer instance.
pub struct ServiceContext<S: StoreClient + 'static> {
    store: Arc<S>,
    cache: Arc<QueryCache>,
    retry: Arc<RetryExecutor>,
    error_log: Arc<ErrorLog>,
}

impl<S: StoreClient + 'static> Clone for ServiceContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            retry: Arc::clone(&self.retry),
            error_log: Arc::clone(&self.error_log),
        }
    }
}

impl<S: StoreClient + 'static> ServiceContext<S> {
    pub fn new(store: S) -> Self {
        Self::with_parts(store, CacheConfig::default(), RetryPolicy::default())
    }

    pub fn with_parts(store: S, cache: CacheConfig, policy: RetryPolicy) -> Self {
        let error_log = Arc::new(ErrorLog::new());
        Self {
            store: Arc::new(store),
            cache: Arc::new(QueryCache::new(cache)),
            retry: Arc::new(RetryExecutor::new(policy, Arc::clone(&error_log))),
            error_log,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn retry(&self) -> &RetryExecutor {
        &self.retry
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    /// Flip connectivity; going online replays the offline queue.
    pub async fn set_online(&self, online: bool) {
        self.retry.set_online(online).await;
    }

    fn entity<T: Entity>(&self) -> EntityService<T, S> {
        EntityService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            Arc::clone(&self.retry),
            Arc::clone(&self.error_log),
        )
    }

    pub fn buildings(&self) -> BuildingService<S> {
        BuildingService::new(self.entity::<Building>())
    }

    pub fn rooms(&self) -> RoomService<S> {
        RoomService::new(self.entity::<Room>())
    }

    pub fn tenants(&self) -> TenantService<S> {
        TenantService::new(self.entity::<Tenant>())
    }

    pub fn operators(&self) -> OperatorService<S> {
        OperatorService::new(self.entity::<Operator>())
    }

    pub fn leads(&self) -> LeadService<S> {
        LeadService::new(self.entity::<Lead>(), self.tenants())
    }
}
