//! Room service.

use serde_json::json;

use homewiz_core::models::room::{CreateRoom, Room, UpdateRoom};
use homewiz_core::query::{ListOptions, SortOrder};
use homewiz_core::response::{DatabaseResponse, ListResponse};
use homewiz_core::store::{SelectQuery, StoreClient};

use crate::service::EntityService;

pub struct RoomService<S: StoreClient + 'static> {
    entity: EntityService<Room, S>,
}

impl<S: StoreClient + 'static> RoomService<S> {
    pub fn new(entity: EntityService<Room, S>) -> Self {
        Self { entity }
    }

    pub async fn create(&self, input: CreateRoom) -> DatabaseResponse<Room> {
        self.entity.create(input).await
    }

    pub async fn get_by_id(&self, id: &str) -> DatabaseResponse<Room> {
        self.entity.get_by_id(&id.to_string()).await
    }

    pub async fn update(&self, id: &str, patch: UpdateRoom) -> DatabaseResponse<Room> {
        self.entity.update(&id.to_string(), patch).await
    }

    pub async fn delete(&self, id: &str) -> DatabaseResponse<bool> {
        self.entity.delete(&id.to_string()).await
    }

    pub async fn list(&self, options: ListOptions) -> ListResponse<Room> {
        self.entity.list(options).await
    }

    /// Rooms in one building, via the cached generic list path.
    pub async fn list_by_building(&self, building_id: &str) -> ListResponse<Room> {
        self.entity
            .list(ListOptions::new().filter("building_id", building_id))
            .await
    }

    /// Rooms whose rent falls inside `[min, max]`, cheapest first.
    /// One-off range query, uncached.
    pub async fn by_price_range(&self, min: f64, max: f64) -> ListResponse<Room> {
        let label = "rooms.by_price_range";
        let query = SelectQuery::default()
            .between("private_room_rent", Some(json!(min)), Some(json!(max)))
            .order_by("private_room_rent", SortOrder::Asc);

        match self.entity.raw_select(label, query).await {
            Ok(result) => {
                let rooms: Vec<Room> = result
                    .rows
                    .into_iter()
                    .filter_map(|row| serde_json::from_value(row).ok())
                    .collect();
                let count = rooms.len() as u64;
                ListResponse::ok(rooms, Some(count))
            }
            Err(err) => ListResponse::failure(err),
        }
    }
}
