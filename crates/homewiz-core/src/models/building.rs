//! Building domain model.
//!
//! Buildings are the root of the property hierarchy. Rooms reference a
//! building by `building_id`; deleting a building does not cascade to its
//! rooms or tenants at this layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

fn default_true() -> bool {
    true
}

/// A managed building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    /// Caller-supplied unique id (e.g. `BLDG_101`).
    pub building_id: String,
    pub building_name: String,
    #[serde(default)]
    pub full_address: Option<String>,
    /// Operator responsible for the building. Many buildings may share one
    /// operator; nothing enforces the reference client-side.
    #[serde(default)]
    pub operator_id: Option<i64>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub floors: Option<i32>,
    #[serde(default)]
    pub total_rooms: Option<i32>,
    #[serde(default)]
    pub total_bathrooms: Option<i32>,
    #[serde(default = "default_true")]
    pub wifi_included: bool,
    #[serde(default = "default_true")]
    pub laundry_onsite: bool,
    /// Assigned by the backend on insert.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Stamped by the service on every update.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Fields accepted when creating a building.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBuilding {
    /// Left `None` to have the building service generate a `BLDG_NNN` id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    pub building_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bathrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_included: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laundry_onsite: Option<bool>,
}

impl CreateBuilding {
    /// Minimal payload: id + name, everything else defaulted.
    pub fn new(building_id: impl Into<String>, building_name: impl Into<String>) -> Self {
        Self {
            building_id: Some(building_id.into()),
            building_name: building_name.into(),
            ..Self::default()
        }
    }
}

/// Fields that can be updated on an existing building.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBuilding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bathrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_included: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laundry_onsite: Option<bool>,
}

impl Entity for Building {
    const TABLE: &'static str = "buildings";
    const ID_COLUMN: &'static str = "building_id";
    const WRITE_STAMP: Option<&'static str> = Some("last_modified");

    type Id = String;
    type Create = CreateBuilding;
    type Update = UpdateBuilding;

    fn id(&self) -> String {
        self.building_id.clone()
    }
}
