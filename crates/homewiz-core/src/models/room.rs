//! Room domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Occupancy state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl Default for RoomStatus {
    fn default() -> Self {
        RoomStatus::Available
    }
}

/// A rentable room inside a building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub room_number: String,
    /// Owning building; required at creation time.
    pub building_id: String,
    #[serde(default)]
    pub floor_number: Option<i32>,
    #[serde(default)]
    pub maximum_people_in_room: Option<i32>,
    #[serde(default)]
    pub private_room_rent: Option<f64>,
    #[serde(default)]
    pub bathroom_type: Option<String>,
    #[serde(default)]
    pub bed_size: Option<String>,
    #[serde(default)]
    pub bed_type: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub sq_footage: Option<i32>,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoom {
    pub room_id: String,
    pub room_number: String,
    pub building_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_people_in_room: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_room_rent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathroom_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sq_footage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
}

impl CreateRoom {
    pub fn new(
        room_id: impl Into<String>,
        room_number: impl Into<String>,
        building_id: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            room_number: room_number.into(),
            building_id: building_id.into(),
            floor_number: None,
            maximum_people_in_room: None,
            private_room_rent: None,
            bathroom_type: None,
            bed_size: None,
            bed_type: None,
            view: None,
            sq_footage: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_people_in_room: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_room_rent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathroom_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sq_footage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
}

impl Entity for Room {
    const TABLE: &'static str = "rooms";
    const ID_COLUMN: &'static str = "room_id";
    const WRITE_STAMP: Option<&'static str> = Some("last_modified");

    type Id = String;
    type Create = CreateRoom;
    type Update = UpdateRoom;

    fn id(&self) -> String {
        self.room_id.clone()
    }
}
