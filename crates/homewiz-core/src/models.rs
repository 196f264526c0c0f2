//! Domain models for HomeWiz.
//!
//! Each entity module defines the stored record, a `Create*` insert shape,
//! and an `Update*` partial-update shape. Status-like columns are real sum
//! types; unrecognized values are rejected at the serde boundary instead of
//! being written through.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod building;
pub mod lead;
pub mod operator;
pub mod room;
pub mod tenant;

/// Table-level metadata the generic CRUD service is keyed on.
///
/// Table schemas are inconsistent about their write-stamp column (buildings
/// and rooms use `last_modified`, operators use `last_active`, leads have
/// none), so the column is resolved per entity rather than by convention.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Backend table name.
    const TABLE: &'static str;
    /// Primary id column name.
    const ID_COLUMN: &'static str;
    /// Column stamped with the current time on every update, if the table
    /// has one.
    const WRITE_STAMP: Option<&'static str>;

    /// Primary id type (string for most tables, numeric for operators).
    type Id: Clone + fmt::Display + Serialize + Send + Sync + 'static;

    /// Insert payload.
    type Create: Serialize + Send + Sync + 'static;
    /// Partial-update payload; only set fields are serialized.
    type Update: Serialize + Send + Sync + 'static;

    /// The record's primary id.
    fn id(&self) -> Self::Id;

    /// Value written into [`Self::WRITE_STAMP`] on update. Most tables use
    /// a full timestamp; date-typed columns override this.
    fn write_stamp_value() -> Value {
        Value::String(chrono::Utc::now().to_rfc3339())
    }
}

/// Serialize an entity id to the JSON value the storage seam expects.
pub fn id_to_value<E: Entity>(id: &E::Id) -> Value {
    serde_json::to_value(id).unwrap_or_else(|_| Value::String(id.to_string()))
}
