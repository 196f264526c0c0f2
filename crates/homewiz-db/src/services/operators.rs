//! Operator service.

use chrono::Utc;

use homewiz_core::error::{EnhancedError, ErrorCategory};
use homewiz_core::models::operator::{CreateOperator, Operator, UpdateOperator};
use homewiz_core::query::ListOptions;
use homewiz_core::response::{DatabaseResponse, ListResponse};
use homewiz_core::store::{SelectQuery, StoreClient};

use crate::service::EntityService;

pub struct OperatorService<S: StoreClient + 'static> {
    entity: EntityService<Operator, S>,
}

impl<S: StoreClient + 'static> OperatorService<S> {
    pub fn new(entity: EntityService<Operator, S>) -> Self {
        Self { entity }
    }

    /// Create an operator. Email is unique, so a duplicate is rejected
    /// with a conflict; `date_joined`/`last_active` are stamped with
    /// today. The numeric id comes back from the backend.
    pub async fn create(&self, mut input: CreateOperator) -> DatabaseResponse<Operator> {
        let label = "operators.create";
        let probe = SelectQuery::default()
            .filter("email", input.email.clone())
            .range(0, 1);
        match self.entity.raw_select(label, probe).await {
            Ok(result) if !result.rows.is_empty() => {
                let err = EnhancedError::new(
                    ErrorCategory::Conflict,
                    format!("operator with email {} already exists", input.email),
                )
                .with_operation(label);
                self.entity.record_error(&err);
                return DatabaseResponse::failure(err);
            }
            Ok(_) => {}
            Err(err) => return DatabaseResponse::failure(err),
        }

        let today = Utc::now().date_naive();
        input.date_joined.get_or_insert(today);
        input.last_active.get_or_insert(today);
        self.entity.create(input).await
    }

    pub async fn get_by_id(&self, id: i64) -> DatabaseResponse<Operator> {
        self.entity.get_by_id(&id).await
    }

    pub async fn update(&self, id: i64, patch: UpdateOperator) -> DatabaseResponse<Operator> {
        self.entity.update(&id, patch).await
    }

    pub async fn delete(&self, id: i64) -> DatabaseResponse<bool> {
        self.entity.delete(&id).await
    }

    pub async fn list(&self, options: ListOptions) -> ListResponse<Operator> {
        self.entity.list(options).await
    }
}
