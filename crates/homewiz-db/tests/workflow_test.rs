//! Integration tests for the per-entity service behaviors: generated
//! ids, duplicate probes, the uncached one-off queries, and the
//! lead-to-tenant conversion.

use chrono::{Days, Utc};

use homewiz_core::error::ErrorCategory;
use homewiz_core::models::building::CreateBuilding;
use homewiz_core::models::lead::{CreateLead, LeadStatus};
use homewiz_core::models::operator::CreateOperator;
use homewiz_core::models::room::{CreateRoom, RoomStatus, UpdateRoom};
use homewiz_core::models::tenant::{CreateTenant, TenantStatus, UpdateTenant};
use homewiz_core::query::ListOptions;
use homewiz_db::{MemoryStore, ServiceContext};

fn setup() -> ServiceContext<MemoryStore> {
    ServiceContext::new(MemoryStore::new())
}

// -----------------------------------------------------------------------
// Buildings & rooms
// -----------------------------------------------------------------------

#[tokio::test]
async fn duplicate_building_id_is_a_conflict() {
    let ctx = setup();
    let buildings = ctx.buildings();

    let first = buildings
        .create(CreateBuilding::new("BLDG_001", "First"))
        .await;
    assert!(first.success);

    let second = buildings
        .create(CreateBuilding::new("BLDG_001", "Imposter"))
        .await;
    assert!(!second.success);
    assert_eq!(
        second.error.expect("conflict").category,
        ErrorCategory::Conflict
    );
}

#[tokio::test]
async fn buildings_with_available_rooms_joins_by_status() {
    let ctx = setup();
    let buildings = ctx.buildings();
    let rooms = ctx.rooms();

    buildings
        .create(CreateBuilding::new("BLDG_001", "Sunrise"))
        .await;
    rooms
        .create(CreateRoom::new("ROOM_001", "101", "BLDG_001"))
        .await;
    rooms
        .create(CreateRoom::new("ROOM_002", "102", "BLDG_001"))
        .await;
    rooms
        .update(
            "ROOM_002",
            UpdateRoom {
                status: Some(RoomStatus::Occupied),
                ..UpdateRoom::default()
            },
        )
        .await;

    let joined = buildings.with_available_rooms().await;
    assert!(joined.success);
    assert_eq!(joined.data.len(), 1);
    let entry = &joined.data[0];
    assert_eq!(entry.building.building_id, "BLDG_001");
    assert_eq!(entry.available_rooms.len(), 1);
    assert_eq!(entry.available_rooms[0].room_id, "ROOM_001");
}

#[tokio::test]
async fn rooms_by_price_range_is_inclusive_and_sorted() {
    let ctx = setup();
    let rooms = ctx.rooms();

    for (id, rent) in [("ROOM_001", 900.0), ("ROOM_002", 1500.0), ("ROOM_003", 2200.0)] {
        let mut input = CreateRoom::new(id, id, "BLDG_001");
        input.private_room_rent = Some(rent);
        rooms.create(input).await;
    }

    let in_range = rooms.by_price_range(900.0, 1500.0).await;
    assert!(in_range.success);
    let ids: Vec<&str> = in_range.data.iter().map(|r| r.room_id.as_str()).collect();
    assert_eq!(ids, vec!["ROOM_001", "ROOM_002"]);
}

// -----------------------------------------------------------------------
// Tenants
// -----------------------------------------------------------------------

#[tokio::test]
async fn tenant_ids_are_generated_sequentially() {
    let ctx = setup();
    let tenants = ctx.tenants();

    let first = tenants
        .create(CreateTenant::new("Alice", "alice@example.com"))
        .await;
    let second = tenants
        .create(CreateTenant::new("Bob", "bob@example.com"))
        .await;

    assert_eq!(first.data.expect("tenant").tenant_id, "TNT_001");
    assert_eq!(second.data.expect("tenant").tenant_id, "TNT_002");
}

#[tokio::test]
async fn tenant_list_combines_filter_and_search() {
    let ctx = setup();
    let tenants = ctx.tenants();

    tenants
        .create(CreateTenant::new("Jane Smith", "jane@example.com"))
        .await;
    tenants
        .create(CreateTenant::new("Janet Doe", "janet@example.com"))
        .await;
    tenants
        .create(CreateTenant::new("Bob Stone", "bob@example.com"))
        .await;

    // Janet moves out; she must drop from the ACTIVE+search result.
    tenants
        .update(
            "TNT_002",
            UpdateTenant {
                status: Some(TenantStatus::MovedOut),
                ..UpdateTenant::default()
            },
        )
        .await;

    let result = tenants
        .list(
            ListOptions::new()
                .filter("status", "ACTIVE")
                .search("jane", &["tenant_name"]),
        )
        .await;
    assert!(result.success);
    let names: Vec<&str> = result.data.iter().map(|t| t.tenant_name.as_str()).collect();
    assert_eq!(names, vec!["Jane Smith"]);
}

#[tokio::test]
async fn upcoming_lease_expirations_windows_on_end_date() {
    let ctx = setup();
    let tenants = ctx.tenants();
    let today = Utc::now().date_naive();

    let mut soon = CreateTenant::new("Soon", "soon@example.com");
    soon.lease_end_date = today.checked_add_days(Days::new(10));
    tenants.create(soon).await;

    let mut later = CreateTenant::new("Later", "later@example.com");
    later.lease_end_date = today.checked_add_days(Days::new(120));
    tenants.create(later).await;

    let expiring = tenants.upcoming_lease_expirations(30).await;
    assert!(expiring.success);
    assert_eq!(expiring.data.len(), 1);
    assert_eq!(expiring.data[0].tenant_name, "Soon");
}

// -----------------------------------------------------------------------
// Operators
// -----------------------------------------------------------------------

#[tokio::test]
async fn operator_ids_are_backend_assigned_and_email_is_unique() {
    let ctx = setup();
    let operators = ctx.operators();

    let first = operators
        .create(CreateOperator::new("Ada", "ada@example.com"))
        .await;
    let record = first.data.expect("operator");
    assert_eq!(record.operator_id, 1);
    assert!(record.date_joined.is_some());
    assert!(record.active);

    let second = operators
        .create(CreateOperator::new("Imposter", "ada@example.com"))
        .await;
    assert!(!second.success);
    assert_eq!(
        second.error.expect("conflict").category,
        ErrorCategory::Conflict
    );
}

// -----------------------------------------------------------------------
// Leads
// -----------------------------------------------------------------------

#[tokio::test]
async fn lead_create_is_idempotent_by_email() {
    let ctx = setup();
    let leads = ctx.leads();

    let first = leads.create(CreateLead::new("maya@example.com")).await;
    let first_id = first.data.expect("lead").lead_id;
    assert_eq!(first_id, "LEAD_001");

    let repeat = leads.create(CreateLead::new("maya@example.com")).await;
    assert!(repeat.success);
    assert_eq!(repeat.message.as_deref(), Some("lead already exists"));
    assert_eq!(repeat.data.expect("lead").lead_id, first_id);
}

#[tokio::test]
async fn lead_conversion_marks_lead_converted() {
    let ctx = setup();
    let leads = ctx.leads();

    leads.create(CreateLead::new("maya@example.com")).await;

    let converted = leads
        .convert_to_tenant("LEAD_001", CreateTenant::new("Maya", "maya@example.com"))
        .await;
    assert!(converted.success, "{:?}", converted.error);
    assert_eq!(converted.data.expect("tenant").tenant_id, "TNT_001");

    let lead = leads.get_by_id("LEAD_001").await.data.expect("lead");
    assert_eq!(lead.status, LeadStatus::Converted);
}

#[tokio::test]
async fn failed_conversion_leaves_lead_status_unchanged() {
    let ctx = setup();
    let leads = ctx.leads();
    let tenants = ctx.tenants();

    // Occupy the email so the tenant insert conflicts.
    tenants
        .create(CreateTenant::new("Existing", "maya@example.com"))
        .await;
    leads.create(CreateLead::new("maya@example.com")).await;

    let converted = leads
        .convert_to_tenant("LEAD_001", CreateTenant::new("Maya", "maya@example.com"))
        .await;
    assert!(!converted.success);
    assert_eq!(
        converted.error.expect("conflict").category,
        ErrorCategory::Conflict
    );

    // Partial failure must not mark the lead CONVERTED.
    let lead = leads.get_by_id("LEAD_001").await.data.expect("lead");
    assert_eq!(lead.status, LeadStatus::Exploring);
}

#[tokio::test]
async fn converting_a_converted_lead_is_rejected() {
    let ctx = setup();
    let leads = ctx.leads();

    leads.create(CreateLead::new("maya@example.com")).await;
    leads
        .convert_to_tenant("LEAD_001", CreateTenant::new("Maya", "maya@example.com"))
        .await;

    let again = leads
        .convert_to_tenant("LEAD_001", CreateTenant::new("Maya", "maya2@example.com"))
        .await;
    assert!(!again.success);
    assert_eq!(
        again.error.expect("conflict").category,
        ErrorCategory::Conflict
    );
}
