//! HomeWiz data layer — storage backends, query cache, retry executor,
//! and CRUD services.
//!
//! This crate provides:
//! - Backend configuration and the hosted REST client ([`DbConfig`],
//!   [`RestStore`])
//! - An in-memory backend for local development and tests
//!   ([`MemoryStore`])
//! - The bounded TTL query cache ([`QueryCache`])
//! - The retry/backoff executor with offline queue ([`RetryExecutor`])
//! - Generic and per-entity CRUD services, composed through
//!   [`ServiceContext`]

pub mod cache;
pub mod config;
pub mod context;
pub mod memory;
pub mod rest;
pub mod retry;
pub mod service;
pub mod services;

pub use cache::{CacheConfig, CacheStats, QueryCache};
pub use config::DbConfig;
pub use context::ServiceContext;
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use retry::{Connectivity, RetryExecutor, RetryPolicy};
pub use service::EntityService;
pub use services::{
    BuildingService, BuildingWithRooms, LeadService, OperatorService, RoomService, TenantService,
};
