//! Tenant domain model.
//!
//! A tenant is a person on a lease, optionally tied to a room and building.
//! The lease date pair carries the `lease_end_date > lease_start_date`
//! invariant, checked at form-validation time only; storage does not
//! enforce it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Residency state of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    Active,
    NoticeGiven,
    MovedOut,
}

impl Default for TenantStatus {
    fn default() -> Self {
        TenantStatus::Active
    }
}

/// Billing state of a tenant's account.
///
/// Independently mutable from [`TenantStatus`]; the two are never
/// reconciled against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Current,
    Overdue,
    Delinquent,
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Current
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Generated id of the form `TNT_NNN`.
    pub tenant_id: String,
    pub tenant_name: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub lease_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub lease_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub operator_id: Option<i64>,
    #[serde(default)]
    pub booking_type: Option<String>,
    #[serde(default)]
    pub tenant_nationality: Option<String>,
    pub tenant_email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub building_id: Option<String>,
    #[serde(default)]
    pub status: TenantStatus,
    #[serde(default)]
    pub account_status: AccountStatus,
    #[serde(default)]
    pub deposit_amount: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Filled in by the tenant service; callers leave it `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub tenant_name: String,
    pub tenant_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<f64>,
}

impl CreateTenant {
    pub fn new(tenant_name: impl Into<String>, tenant_email: impl Into<String>) -> Self {
        Self {
            tenant_id: None,
            tenant_name: tenant_name.into(),
            tenant_email: tenant_email.into(),
            room_id: None,
            room_number: None,
            lease_start_date: None,
            lease_end_date: None,
            operator_id: None,
            booking_type: None,
            tenant_nationality: None,
            phone: None,
            building_id: None,
            deposit_amount: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TenantStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_status: Option<AccountStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<f64>,
}

impl Entity for Tenant {
    const TABLE: &'static str = "tenants";
    const ID_COLUMN: &'static str = "tenant_id";
    const WRITE_STAMP: Option<&'static str> = Some("last_modified");

    type Id = String;
    type Create = CreateTenant;
    type Update = UpdateTenant;

    fn id(&self) -> String {
        self.tenant_id.clone()
    }
}
