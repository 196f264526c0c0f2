//! Per-entity CRUD services.
//!
//! Each service wraps the generic [`EntityService`](crate::service::EntityService)
//! with the behaviors its table needs: duplicate probes, generated ids,
//! write-time stamping, and the uncached one-off queries.

mod buildings;
mod leads;
mod operators;
mod rooms;
mod tenants;

pub use buildings::{BuildingService, BuildingWithRooms};
pub use leads::LeadService;
pub use operators::OperatorService;
pub use rooms::RoomService;
pub use tenants::TenantService;
