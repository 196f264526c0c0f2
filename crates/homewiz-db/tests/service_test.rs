//! Integration tests for the generic CRUD service over the in-memory
//! backend.

use homewiz_core::error::ErrorCategory;
use homewiz_core::models::building::{CreateBuilding, UpdateBuilding};
use homewiz_core::query::{ListOptions, SortOrder};
use homewiz_db::{DbConfig, MemoryStore, RestStore, ServiceContext};

fn setup() -> ServiceContext<MemoryStore> {
    ServiceContext::new(MemoryStore::new())
}

#[tokio::test]
async fn create_building_returns_stored_record() {
    let ctx = setup();
    let buildings = ctx.buildings();

    let mut input = CreateBuilding::new("BLDG_001", "Test");
    input.city = Some("SF".into());

    let created = buildings.create(input).await;
    assert!(created.success, "{:?}", created.error);
    let record = created.data.expect("created building");
    assert_eq!(record.building_id, "BLDG_001");
    assert_eq!(record.city.as_deref(), Some("SF"));
    // Backend-assigned on insert.
    assert!(record.created_at.is_some());
    // Column defaults apply when the payload omits them.
    assert!(record.wifi_included);
}

#[tokio::test]
async fn create_building_without_id_generates_one() {
    let ctx = setup();
    let buildings = ctx.buildings();

    let input = CreateBuilding {
        building_name: "Test".into(),
        city: Some("SF".into()),
        ..CreateBuilding::default()
    };

    let created = buildings.create(input).await;
    assert!(created.success, "{:?}", created.error);
    let record = created.data.expect("created building");
    assert_eq!(record.building_id, "BLDG_001");
    assert!(record.created_at.is_some());

    // Cache-first read returns the same record.
    buildings.get_by_id("BLDG_001").await;
    let cached = buildings.get_by_id("BLDG_001").await;
    assert_eq!(cached.message.as_deref(), Some("from cache"));
    assert_eq!(cached.data.expect("building").building_name, "Test");
}

#[tokio::test]
async fn get_by_id_is_cached_after_first_read() {
    let ctx = setup();
    let buildings = ctx.buildings();

    buildings
        .create(CreateBuilding::new("BLDG_001", "Test"))
        .await;

    let first = buildings.get_by_id("BLDG_001").await;
    assert!(first.success);
    assert_eq!(first.message, None);

    let second = buildings.get_by_id("BLDG_001").await;
    assert!(second.success);
    assert_eq!(second.message.as_deref(), Some("from cache"));
    assert!(ctx.cache().stats().hits >= 1);
}

#[tokio::test]
async fn get_by_id_missing_record_is_not_found() {
    let ctx = setup();
    let response = ctx.buildings().get_by_id("BLDG_404").await;

    assert!(!response.success);
    let err = response.error.expect("classified error");
    assert_eq!(err.category, ErrorCategory::NotFound);
    assert!(!err.retryable);
    // The failure went into the bounded log.
    assert_eq!(ctx.error_log().stats().total, 1);
}

#[tokio::test]
async fn create_then_list_sees_new_record_without_manual_clear() {
    let ctx = setup();
    let buildings = ctx.buildings();

    buildings
        .create(CreateBuilding::new("BLDG_001", "First"))
        .await;

    // Prime the list cache.
    let listed = buildings.list(ListOptions::new()).await;
    assert_eq!(listed.data.len(), 1);

    // A second create invalidates the namespace; the next list must see
    // both records with no manual cache clear.
    buildings
        .create(CreateBuilding::new("BLDG_002", "Second"))
        .await;
    let listed = buildings.list(ListOptions::new()).await;
    assert_eq!(listed.data.len(), 2);
    assert_eq!(listed.count, Some(2));
}

#[tokio::test]
async fn list_is_served_from_cache_on_repeat() {
    let ctx = setup();
    let buildings = ctx.buildings();
    buildings
        .create(CreateBuilding::new("BLDG_001", "Test"))
        .await;

    let first = buildings.list(ListOptions::new()).await;
    assert!(first.message.is_none());
    let second = buildings.list(ListOptions::new()).await;
    assert_eq!(second.message.as_deref(), Some("from cache"));
    assert_eq!(second.data.len(), 1);
}

#[tokio::test]
async fn update_stamps_write_column_and_invalidates() {
    let ctx = setup();
    let buildings = ctx.buildings();
    buildings
        .create(CreateBuilding::new("BLDG_001", "Before"))
        .await;

    // Prime the single-record cache.
    buildings.get_by_id("BLDG_001").await;

    let updated = buildings
        .update(
            "BLDG_001",
            UpdateBuilding {
                building_name: Some("After".into()),
                ..UpdateBuilding::default()
            },
        )
        .await;
    assert!(updated.success);
    let record = updated.data.expect("updated building");
    assert_eq!(record.building_name, "After");
    assert!(record.last_modified.is_some());

    // The cached copy was invalidated, so this read is fresh.
    let fetched = buildings.get_by_id("BLDG_001").await;
    assert_eq!(fetched.message, None);
    assert_eq!(fetched.data.expect("building").building_name, "After");
}

#[tokio::test]
async fn delete_removes_record_and_reports_misses() {
    let ctx = setup();
    let buildings = ctx.buildings();
    buildings
        .create(CreateBuilding::new("BLDG_001", "Doomed"))
        .await;

    let deleted = buildings.delete("BLDG_001").await;
    assert!(deleted.success);
    assert_eq!(deleted.data, Some(true));

    let again = buildings.delete("BLDG_001").await;
    assert!(again.success);
    assert_eq!(again.data, Some(false));

    let listed = buildings.list(ListOptions::new()).await;
    assert!(listed.data.is_empty());
}

#[tokio::test]
async fn list_paginates_and_sorts() {
    let ctx = setup();
    let buildings = ctx.buildings();
    for i in 1..=5 {
        buildings
            .create(CreateBuilding::new(
                format!("BLDG_{i:03}"),
                format!("Building {i}"),
            ))
            .await;
    }

    let page = buildings
        .list(
            ListOptions::new()
                .page(2)
                .limit(2)
                .sort("building_id", SortOrder::Asc),
        )
        .await;
    assert!(page.success);
    assert_eq!(page.count, Some(5));
    let ids: Vec<&str> = page.data.iter().map(|b| b.building_id.as_str()).collect();
    assert_eq!(ids, vec!["BLDG_003", "BLDG_004"]);
}

#[tokio::test]
async fn disabled_backend_fails_fast_with_descriptive_error() {
    let ctx = ServiceContext::new(RestStore::new(&DbConfig::default()));
    let response = ctx.buildings().get_by_id("BLDG_001").await;

    assert!(!response.success);
    let err = response.error.expect("classified error");
    assert_eq!(err.category, ErrorCategory::ClientError);
    assert!(err.message.contains("HOMEWIZ_BACKEND_URL"));
    assert!(!err.retryable);
}
