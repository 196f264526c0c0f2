//! Per-entity form payloads.
//!
//! Fields are strings (or raw booleans) exactly as a UI submits them.
//! `into_insert()` is the only path from a form to a typed insert shape.

use serde::Deserialize;

use homewiz_core::models::building::CreateBuilding;
use homewiz_core::models::lead::{CreateLead, LeadStatus};
use homewiz_core::models::operator::{CreateOperator, OperatorType};
use homewiz_core::models::room::{CreateRoom, RoomStatus};
use homewiz_core::models::tenant::CreateTenant;

use crate::fields;
use crate::report::ValidationReport;

fn opt(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

/// New-building form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildingForm {
    #[serde(default)]
    pub building_id: String,
    #[serde(default)]
    pub building_name: String,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub operator_id: Option<String>,
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
    pub floors: Option<String>,
    #[serde(default)]
    pub total_rooms: Option<String>,
    #[serde(default)]
    pub total_bathrooms: Option<String>,
    #[serde(default)]
    pub wifi_included: Option<bool>,
    #[serde(default)]
    pub laundry_onsite: Option<bool>,
}

impl BuildingForm {
    fn build(&self, report: &mut ValidationReport) -> CreateBuilding {
        fields::require(report, "building_id", &self.building_id);
        fields::require(report, "building_name", &self.building_name);

        CreateBuilding {
            building_id: Some(self.building_id.trim().to_string()),
            building_name: self.building_name.trim().to_string(),
            full_address: opt(&self.full_address),
            operator_id: fields::parse_i64(report, "operator_id", self.operator_id.as_deref()),
            street: opt(&self.street),
            area: opt(&self.area),
            city: opt(&self.city),
            state: opt(&self.state),
            zip: opt(&self.zip),
            floors: fields::parse_i32(report, "floors", self.floors.as_deref()),
            total_rooms: fields::parse_i32(report, "total_rooms", self.total_rooms.as_deref()),
            total_bathrooms: fields::parse_i32(
                report,
                "total_bathrooms",
                self.total_bathrooms.as_deref(),
            ),
            wifi_included: self.wifi_included,
            laundry_onsite: self.laundry_onsite,
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.build(&mut report);
        report
    }

    pub fn into_insert(self) -> Result<CreateBuilding, ValidationReport> {
        let mut report = ValidationReport::new();
        let create = self.build(&mut report);
        report.into_result(create)
    }
}

/// New-room form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomForm {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub building_id: String,
    #[serde(default)]
    pub floor_number: Option<String>,
    #[serde(default)]
    pub maximum_people_in_room: Option<String>,
    #[serde(default)]
    pub private_room_rent: Option<String>,
    #[serde(default)]
    pub bathroom_type: Option<String>,
    #[serde(default)]
    pub bed_size: Option<String>,
    #[serde(default)]
    pub bed_type: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub sq_footage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RoomForm {
    fn build(&self, report: &mut ValidationReport) -> CreateRoom {
        fields::require(report, "room_id", &self.room_id);
        fields::require(report, "room_number", &self.room_number);
        fields::require(report, "building_id", &self.building_id);

        CreateRoom {
            room_id: self.room_id.trim().to_string(),
            room_number: self.room_number.trim().to_string(),
            building_id: self.building_id.trim().to_string(),
            floor_number: fields::parse_i32(report, "floor_number", self.floor_number.as_deref()),
            maximum_people_in_room: fields::parse_i32(
                report,
                "maximum_people_in_room",
                self.maximum_people_in_room.as_deref(),
            ),
            private_room_rent: fields::parse_amount(
                report,
                "private_room_rent",
                self.private_room_rent.as_deref(),
            ),
            bathroom_type: opt(&self.bathroom_type),
            bed_size: opt(&self.bed_size),
            bed_type: opt(&self.bed_type),
            view: opt(&self.view),
            sq_footage: fields::parse_i32(report, "sq_footage", self.sq_footage.as_deref()),
            status: fields::parse_enum::<RoomStatus>(report, "status", self.status.as_deref()),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.build(&mut report);
        report
    }

    pub fn into_insert(self) -> Result<CreateRoom, ValidationReport> {
        let mut report = ValidationReport::new();
        let create = self.build(&mut report);
        report.into_result(create)
    }
}

/// New-tenant form. Carries the lease-date ordering invariant: this is
/// the only place `lease_end_date > lease_start_date` is checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantForm {
    #[serde(default)]
    pub tenant_name: String,
    #[serde(default)]
    pub tenant_email: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub lease_start_date: Option<String>,
    #[serde(default)]
    pub lease_end_date: Option<String>,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub booking_type: Option<String>,
    #[serde(default)]
    pub tenant_nationality: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub building_id: Option<String>,
    #[serde(default)]
    pub deposit_amount: Option<String>,
}

impl TenantForm {
    fn build(&self, report: &mut ValidationReport) -> CreateTenant {
        fields::require(report, "tenant_name", &self.tenant_name);
        fields::require_email(report, "tenant_email", &self.tenant_email);

        let lease_start =
            fields::parse_date(report, "lease_start_date", self.lease_start_date.as_deref());
        let lease_end =
            fields::parse_date(report, "lease_end_date", self.lease_end_date.as_deref());
        if let (Some(start), Some(end)) = (lease_start, lease_end) {
            if end <= start {
                report.add("lease_end_date", "lease end must be after lease start");
            }
        }

        CreateTenant {
            tenant_id: None,
            tenant_name: self.tenant_name.trim().to_string(),
            tenant_email: self.tenant_email.trim().to_string(),
            room_id: opt(&self.room_id),
            room_number: opt(&self.room_number),
            lease_start_date: lease_start,
            lease_end_date: lease_end,
            operator_id: fields::parse_i64(report, "operator_id", self.operator_id.as_deref()),
            booking_type: opt(&self.booking_type),
            tenant_nationality: opt(&self.tenant_nationality),
            phone: opt(&self.phone),
            building_id: opt(&self.building_id),
            deposit_amount: fields::parse_amount(
                report,
                "deposit_amount",
                self.deposit_amount.as_deref(),
            ),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.build(&mut report);
        report
    }

    pub fn into_insert(self) -> Result<CreateTenant, ValidationReport> {
        let mut report = ValidationReport::new();
        let create = self.build(&mut report);
        report.into_result(create)
    }
}

/// New-operator form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub operator_type: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl OperatorForm {
    fn build(&self, report: &mut ValidationReport) -> CreateOperator {
        fields::require(report, "name", &self.name);
        fields::require_email(report, "email", &self.email);

        CreateOperator {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: opt(&self.phone),
            role: opt(&self.role),
            operator_type: fields::parse_enum::<OperatorType>(
                report,
                "operator_type",
                self.operator_type.as_deref(),
            ),
            active: self.active,
            date_joined: None,
            last_active: None,
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.build(&mut report);
        report
    }

    pub fn into_insert(self) -> Result<CreateOperator, ValidationReport> {
        let mut report = ValidationReport::new();
        let create = self.build(&mut report);
        report.into_result(create)
    }
}

/// New-lead form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rooms_interested: Option<String>,
    #[serde(default)]
    pub visa_status: Option<String>,
    #[serde(default)]
    pub assigned_operator_id: Option<String>,
}

impl LeadForm {
    fn build(&self, report: &mut ValidationReport) -> CreateLead {
        fields::require_email(report, "email", &self.email);

        CreateLead {
            lead_id: None,
            email: self.email.trim().to_string(),
            status: fields::parse_enum::<LeadStatus>(report, "status", self.status.as_deref()),
            rooms_interested: opt(&self.rooms_interested),
            visa_status: opt(&self.visa_status),
            assigned_operator_id: fields::parse_i64(
                report,
                "assigned_operator_id",
                self.assigned_operator_id.as_deref(),
            ),
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.build(&mut report);
        report
    }

    pub fn into_insert(self) -> Result<CreateLead, ValidationReport> {
        let mut report = ValidationReport::new();
        let create = self.build(&mut report);
        report.into_result(create)
    }
}
