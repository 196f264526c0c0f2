//! HomeWiz Forms — validation and transformation of external form
//! payloads into entity insert/update shapes.
//!
//! Form structs mirror what a UI submits: strings all the way down.
//! `validate()` produces a [`report::ValidationReport`]; `into_insert()`
//! parses the payload into the typed `Create*` shape, so nothing
//! unvalidated ever reaches the CRUD services.

pub mod fields;
pub mod forms;
pub mod report;

pub use forms::{BuildingForm, LeadForm, OperatorForm, RoomForm, TenantForm};
pub use report::ValidationReport;
