//! Operator domain model.
//!
//! Operators are staff members (leasing agents, building managers, etc.).
//! Unlike the other tables, the primary id is numeric and assigned by the
//! backend, and the write-stamp column is `last_active`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorType {
    LeasingAgent,
    BuildingManager,
    Maintenance,
    Admin,
}

impl Default for OperatorType {
    fn default() -> Self {
        OperatorType::LeasingAgent
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    /// Backend-assigned numeric id.
    pub operator_id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "Operator::default_active")]
    pub active: bool,
    #[serde(default)]
    pub date_joined: Option<NaiveDate>,
    #[serde(default)]
    pub last_active: Option<NaiveDate>,
    #[serde(default)]
    pub operator_type: OperatorType,
}

impl Operator {
    fn default_active() -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOperator {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_type: Option<OperatorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Stamped with today's date by the operator service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<NaiveDate>,
}

impl CreateOperator {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            role: None,
            operator_type: None,
            active: None,
            date_joined: None,
            last_active: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOperator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_type: Option<OperatorType>,
}

impl Entity for Operator {
    const TABLE: &'static str = "operators";
    const ID_COLUMN: &'static str = "operator_id";
    const WRITE_STAMP: Option<&'static str> = Some("last_active");

    type Id = i64;
    type Create = CreateOperator;
    type Update = UpdateOperator;

    fn id(&self) -> i64 {
        self.operator_id
    }

    // `last_active` is a date column, not a timestamp.
    fn write_stamp_value() -> serde_json::Value {
        serde_json::Value::String(chrono::Utc::now().date_naive().to_string())
    }
}
