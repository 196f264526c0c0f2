//! Lead domain model.
//!
//! Leads move through a status workflow (`EXPLORING` onward) and may be
//! converted into a tenant. Conversion is a two-step, non-transactional
//! operation owned by the lead service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Workflow position of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    Exploring,
    Interested,
    ScheduledViewing,
    ApplicationStarted,
    Converted,
    Lost,
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::Exploring
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Generated id of the form `LEAD_NNN`.
    pub lead_id: String,
    pub email: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub interaction_count: i64,
    /// JSON-encoded list of room ids; kept opaque at this layer.
    #[serde(default)]
    pub rooms_interested: Option<String>,
    #[serde(default)]
    pub selected_room_id: Option<String>,
    /// JSON-encoded list of dates; kept opaque at this layer.
    #[serde(default)]
    pub showing_dates: Option<String>,
    #[serde(default)]
    pub planned_move_in: Option<String>,
    #[serde(default)]
    pub planned_move_out: Option<String>,
    #[serde(default)]
    pub visa_status: Option<String>,
    #[serde(default)]
    pub assigned_operator_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLead {
    /// Filled in by the lead service; callers leave it `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms_interested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_operator_id: Option<i64>,
}

impl CreateLead {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            lead_id: None,
            email: email.into(),
            status: None,
            rooms_interested: None,
            visa_status: None,
            assigned_operator_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms_interested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showing_dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_move_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_move_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_operator_id: Option<i64>,
}

impl Entity for Lead {
    const TABLE: &'static str = "leads";
    const ID_COLUMN: &'static str = "lead_id";
    // Leads carry no write-stamp column.
    const WRITE_STAMP: Option<&'static str> = None;

    type Id = String;
    type Create = CreateLead;
    type Update = UpdateLead;

    fn id(&self) -> String {
        self.lead_id.clone()
    }
}
