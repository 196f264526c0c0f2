//! Tenant service.

use chrono::{Days, Utc};
use serde_json::json;

use homewiz_core::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use homewiz_core::query::{ListOptions, SortOrder};
use homewiz_core::response::{DatabaseResponse, ListResponse};
use homewiz_core::store::{SelectQuery, StoreClient};

use crate::service::EntityService;

pub struct TenantService<S: StoreClient + 'static> {
    entity: EntityService<Tenant, S>,
}

impl<S: StoreClient + 'static> Clone for TenantService<S> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
        }
    }
}

impl<S: StoreClient + 'static> TenantService<S> {
    pub fn new(entity: EntityService<Tenant, S>) -> Self {
        Self { entity }
    }

    /// Create a tenant, generating a `TNT_NNN` id from the current row
    /// count when the caller did not supply one. The count+1 scheme is
    /// racy under concurrent creates, matching the original behavior.
    pub async fn create(&self, mut input: CreateTenant) -> DatabaseResponse<Tenant> {
        if input.tenant_id.is_none() {
            let count = match self.entity.count("tenants.create").await {
                Ok(count) => count,
                Err(err) => return DatabaseResponse::failure(err),
            };
            input.tenant_id = Some(format!("TNT_{:03}", count + 1));
        }
        self.entity.create(input).await
    }

    pub async fn get_by_id(&self, id: &str) -> DatabaseResponse<Tenant> {
        self.entity.get_by_id(&id.to_string()).await
    }

    pub async fn update(&self, id: &str, patch: UpdateTenant) -> DatabaseResponse<Tenant> {
        self.entity.update(&id.to_string(), patch).await
    }

    pub async fn delete(&self, id: &str) -> DatabaseResponse<bool> {
        self.entity.delete(&id.to_string()).await
    }

    pub async fn list(&self, options: ListOptions) -> ListResponse<Tenant> {
        self.entity.list(options).await
    }

    /// Active tenants whose lease ends within the next `days` days,
    /// soonest first. One-off date-window query, uncached.
    pub async fn upcoming_lease_expirations(&self, days: u64) -> ListResponse<Tenant> {
        let label = "tenants.upcoming_lease_expirations";
        let today = Utc::now().date_naive();
        let until = today.checked_add_days(Days::new(days)).unwrap_or(today);

        let query = SelectQuery::default()
            .filter("status", "ACTIVE")
            .between(
                "lease_end_date",
                Some(json!(today.to_string())),
                Some(json!(until.to_string())),
            )
            .order_by("lease_end_date", SortOrder::Asc);

        match self.entity.raw_select(label, query).await {
            Ok(result) => {
                let tenants: Vec<Tenant> = result
                    .rows
                    .into_iter()
                    .filter_map(|row| serde_json::from_value(row).ok())
                    .collect();
                let count = tenants.len() as u64;
                ListResponse::ok(tenants, Some(count))
            }
            Err(err) => ListResponse::failure(err),
        }
    }
}
