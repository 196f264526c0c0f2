//! Form validation and transformation tests.

use homewiz_core::models::lead::LeadStatus;
use homewiz_core::models::room::RoomStatus;
use homewiz_forms::{BuildingForm, LeadForm, RoomForm, TenantForm};

#[test]
fn valid_building_form_transforms_to_insert_shape() {
    let form = BuildingForm {
        building_id: "BLDG_001".into(),
        building_name: "Sunrise".into(),
        city: Some("SF".into()),
        floors: Some("4".into()),
        wifi_included: Some(false),
        ..BuildingForm::default()
    };

    let report = form.validate();
    assert!(report.is_valid, "{:?}", report.errors);

    let create = form.into_insert().expect("valid form");
    assert_eq!(create.building_id.as_deref(), Some("BLDG_001"));
    assert_eq!(create.floors, Some(4));
    assert_eq!(create.wifi_included, Some(false));
}

#[test]
fn missing_required_fields_collect_per_field_errors() {
    let form = BuildingForm {
        floors: Some("four".into()),
        ..BuildingForm::default()
    };

    let report = form.validate();
    assert!(!report.is_valid);
    assert!(report.errors.contains_key("building_id"));
    assert!(report.errors.contains_key("building_name"));
    assert!(report.errors.contains_key("floors"));
}

#[test]
fn tenant_lease_dates_must_be_ordered() {
    let form = TenantForm {
        tenant_name: "Jane".into(),
        tenant_email: "jane@example.com".into(),
        lease_start_date: Some("2025-06-01".into()),
        lease_end_date: Some("2025-01-01".into()),
        ..TenantForm::default()
    };

    let report = form.validate();
    assert!(!report.is_valid);
    assert_eq!(
        report.errors.get("lease_end_date").map(String::as_str),
        Some("lease end must be after lease start")
    );

    let form = TenantForm {
        lease_end_date: Some("2026-06-01".into()),
        lease_start_date: Some("2025-06-01".into()),
        tenant_name: "Jane".into(),
        tenant_email: "jane@example.com".into(),
        ..TenantForm::default()
    };
    let create = form.into_insert().expect("ordered dates");
    assert!(create.lease_start_date.unwrap() < create.lease_end_date.unwrap());
}

#[test]
fn tenant_email_shape_is_enforced() {
    let form = TenantForm {
        tenant_name: "Jane".into(),
        tenant_email: "not-an-email".into(),
        ..TenantForm::default()
    };
    assert!(form.into_insert().is_err());
}

#[test]
fn room_status_must_be_a_known_value() {
    let mut form = RoomForm {
        room_id: "ROOM_001".into(),
        room_number: "101".into(),
        building_id: "BLDG_001".into(),
        status: Some("HAUNTED".into()),
        ..RoomForm::default()
    };
    let report = form.validate();
    assert!(!report.is_valid);
    assert!(report.errors.contains_key("status"));

    form.status = Some("MAINTENANCE".into());
    let create = form.into_insert().expect("known status");
    assert_eq!(create.status, Some(RoomStatus::Maintenance));
}

#[test]
fn lead_form_defaults_and_parses_status() {
    let form = LeadForm {
        email: "maya@example.com".into(),
        status: Some("SCHEDULED_VIEWING".into()),
        assigned_operator_id: Some("7".into()),
        ..LeadForm::default()
    };

    let create = form.into_insert().expect("valid lead");
    assert_eq!(create.status, Some(LeadStatus::ScheduledViewing));
    assert_eq!(create.assigned_operator_id, Some(7));
}

#[test]
fn numeric_fields_reject_garbage_but_allow_blanks() {
    let form = RoomForm {
        room_id: "ROOM_001".into(),
        room_number: "101".into(),
        building_id: "BLDG_001".into(),
        private_room_rent: Some("-50".into()),
        sq_footage: Some("".into()),
        ..RoomForm::default()
    };
    let report = form.validate();
    assert!(!report.is_valid);
    assert!(report.errors.contains_key("private_room_rent"));
    assert!(!report.errors.contains_key("sq_footage"));
}
