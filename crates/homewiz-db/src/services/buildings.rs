//! Building service.

use serde::Serialize;
use serde_json::Value;

use homewiz_core::error::{EnhancedError, ErrorCategory};
use homewiz_core::models::building::{Building, CreateBuilding, UpdateBuilding};
use homewiz_core::models::room::Room;
use homewiz_core::models::Entity;
use homewiz_core::query::ListOptions;
use homewiz_core::response::{DatabaseResponse, ListResponse};
use homewiz_core::store::{SelectQuery, StoreClient};

use crate::service::EntityService;

/// A building joined with its currently available rooms.
#[derive(Debug, Clone, Serialize)]
pub struct BuildingWithRooms {
    #[serde(flatten)]
    pub building: Building,
    pub available_rooms: Vec<Room>,
}

pub struct BuildingService<S: StoreClient + 'static> {
    entity: EntityService<Building, S>,
}

impl<S: StoreClient + 'static> BuildingService<S> {
    pub fn new(entity: EntityService<Building, S>) -> Self {
        Self { entity }
    }

    /// Create a building. A caller-supplied id is checked for duplicates
    /// before the insert; a missing id is generated (`BLDG_NNN` from the
    /// current row count, racy under concurrent creates like the other
    /// generated ids).
    pub async fn create(&self, mut input: CreateBuilding) -> DatabaseResponse<Building> {
        let label = "buildings.create";
        match &input.building_id {
            Some(id) => {
                let probe = SelectQuery::default()
                    .filter(Building::ID_COLUMN, id.clone())
                    .range(0, 1);
                match self.entity.raw_select(label, probe).await {
                    Ok(result) if !result.rows.is_empty() => {
                        let err = EnhancedError::new(
                            ErrorCategory::Conflict,
                            format!("building {id} already exists"),
                        )
                        .with_operation(label);
                        self.entity.record_error(&err);
                        return DatabaseResponse::failure(err);
                    }
                    Ok(_) => {}
                    Err(err) => return DatabaseResponse::failure(err),
                }
            }
            None => {
                let count = match self.entity.count(label).await {
                    Ok(count) => count,
                    Err(err) => return DatabaseResponse::failure(err),
                };
                input.building_id = Some(format!("BLDG_{:03}", count + 1));
            }
        }
        self.entity.create(input).await
    }

    pub async fn get_by_id(&self, id: &str) -> DatabaseResponse<Building> {
        self.entity.get_by_id(&id.to_string()).await
    }

    pub async fn update(&self, id: &str, patch: UpdateBuilding) -> DatabaseResponse<Building> {
        self.entity.update(&id.to_string(), patch).await
    }

    pub async fn delete(&self, id: &str) -> DatabaseResponse<bool> {
        self.entity.delete(&id.to_string()).await
    }

    pub async fn list(&self, options: ListOptions) -> ListResponse<Building> {
        self.entity.list(options).await
    }

    /// All buildings with their AVAILABLE rooms attached. Joined in
    /// memory from two uncached reads; accepts the staleness trade-off of
    /// bypassing the cache.
    pub async fn with_available_rooms(&self) -> ListResponse<BuildingWithRooms> {
        let label = "buildings.with_available_rooms";

        let buildings = match self.entity.raw_select(label, SelectQuery::default()).await {
            Ok(result) => result.rows,
            Err(err) => return ListResponse::failure(err),
        };
        let rooms_query = SelectQuery::default().filter("status", "AVAILABLE");
        let rooms = match self
            .entity
            .raw_select_from(Room::TABLE, label, rooms_query)
            .await
        {
            Ok(result) => result.rows,
            Err(err) => return ListResponse::failure(err),
        };

        let mut joined = Vec::with_capacity(buildings.len());
        for row in buildings {
            let building: Building = match serde_json::from_value(row) {
                Ok(building) => building,
                Err(_) => continue,
            };
            let available_rooms: Vec<Room> = rooms
                .iter()
                .filter(|room| {
                    room.get("building_id")
                        .and_then(Value::as_str)
                        .is_some_and(|id| id == building.building_id)
                })
                .filter_map(|room| serde_json::from_value(room.clone()).ok())
                .collect();
            joined.push(BuildingWithRooms {
                building,
                available_rooms,
            });
        }

        let count = joined.len() as u64;
        ListResponse::ok(joined, Some(count))
    }
}
