//! Lead service, including the lead-to-tenant conversion.

use tracing::warn;

use homewiz_core::error::{EnhancedError, ErrorCategory};
use homewiz_core::models::lead::{CreateLead, Lead, LeadStatus, UpdateLead};
use homewiz_core::models::tenant::{CreateTenant, Tenant};
use homewiz_core::query::ListOptions;
use homewiz_core::response::{DatabaseResponse, ListResponse};
use homewiz_core::store::{SelectQuery, StoreClient};

use crate::service::EntityService;
use crate::services::TenantService;

pub struct LeadService<S: StoreClient + 'static> {
    entity: EntityService<Lead, S>,
    tenants: TenantService<S>,
}

impl<S: StoreClient + 'static> LeadService<S> {
    pub fn new(entity: EntityService<Lead, S>, tenants: TenantService<S>) -> Self {
        Self { entity, tenants }
    }

    /// Create a lead, idempotently by email: if a lead with this email
    /// already exists it is returned as-is instead of inserting a
    /// duplicate. Generated ids have the form `LEAD_NNN`.
    pub async fn create(&self, mut input: CreateLead) -> DatabaseResponse<Lead> {
        let label = "leads.create";
        let probe = SelectQuery::default()
            .filter("email", input.email.clone())
            .range(0, 1);
        match self.entity.raw_select(label, probe).await {
            Ok(result) => {
                if let Some(row) = result.rows.into_iter().next() {
                    if let Ok(existing) = serde_json::from_value::<Lead>(row) {
                        return DatabaseResponse::ok_with_message(existing, "lead already exists");
                    }
                }
            }
            Err(err) => return DatabaseResponse::failure(err),
        }

        if input.lead_id.is_none() {
            let count = match self.entity.count(label).await {
                Ok(count) => count,
                Err(err) => return DatabaseResponse::failure(err),
            };
            input.lead_id = Some(format!("LEAD_{:03}", count + 1));
        }
        self.entity.create(input).await
    }

    pub async fn get_by_id(&self, id: &str) -> DatabaseResponse<Lead> {
        self.entity.get_by_id(&id.to_string()).await
    }

    pub async fn update(&self, id: &str, patch: UpdateLead) -> DatabaseResponse<Lead> {
        self.entity.update(&id.to_string(), patch).await
    }

    pub async fn delete(&self, id: &str) -> DatabaseResponse<bool> {
        self.entity.delete(&id.to_string()).await
    }

    pub async fn list(&self, options: ListOptions) -> ListResponse<Lead> {
        self.entity.list(options).await
    }

    /// Convert a lead into a tenant.
    ///
    /// Two sequential writes with no transaction and no compensation:
    /// create the tenant, then mark the lead CONVERTED. If the tenant
    /// insert fails the lead status is left untouched. If the status
    /// update fails after the insert, the tenant exists with the lead
    /// still unconverted; that partial state is surfaced in the message.
    pub async fn convert_to_tenant(
        &self,
        lead_id: &str,
        input: CreateTenant,
    ) -> DatabaseResponse<Tenant> {
        let label = "leads.convert_to_tenant";

        let lead = match self.entity.get_by_id(&lead_id.to_string()).await {
            DatabaseResponse {
                data: Some(lead),
                success: true,
                ..
            } => lead,
            DatabaseResponse {
                error: Some(err), ..
            } => return DatabaseResponse::failure(err),
            _ => {
                return DatabaseResponse::failure(
                    EnhancedError::new(
                        ErrorCategory::NotFound,
                        format!("lead {lead_id} not found"),
                    )
                    .with_operation(label),
                );
            }
        };

        if lead.status == LeadStatus::Converted {
            let err = EnhancedError::new(
                ErrorCategory::Conflict,
                format!("lead {lead_id} is already converted"),
            )
            .with_operation(label);
            self.entity.record_error(&err);
            return DatabaseResponse::failure(err);
        }

        let created = self.tenants.create(input).await;
        let tenant = match created {
            DatabaseResponse {
                data: Some(tenant),
                success: true,
                ..
            } => tenant,
            DatabaseResponse { error, .. } => {
                // Lead status intentionally untouched on partial failure.
                return match error {
                    Some(err) => DatabaseResponse::failure(err),
                    None => DatabaseResponse::failure(
                        EnhancedError::new(ErrorCategory::Unknown, "tenant creation failed")
                            .with_operation(label),
                    ),
                };
            }
        };

        let marked = self
            .entity
            .update(
                &lead_id.to_string(),
                UpdateLead {
                    status: Some(LeadStatus::Converted),
                    ..UpdateLead::default()
                },
            )
            .await;

        if !marked.success {
            warn!(
                lead_id,
                tenant_id = %tenant.tenant_id,
                "tenant created but lead status update failed"
            );
            return DatabaseResponse::ok_with_message(
                tenant,
                "tenant created but lead status update failed",
            );
        }

        DatabaseResponse::ok_with_message(tenant, "lead converted")
    }
}
