//! Core domain types for the HomeWiz data platform.
//!
//! This crate is I/O-free. It defines the entity models, the error
//! taxonomy and classifier, the [`store::StoreClient`] seam that storage
//! backends implement, list/query options, and the uniform response
//! envelope returned by every CRUD operation.

pub mod error;
pub mod models;
pub mod query;
pub mod response;
pub mod store;
