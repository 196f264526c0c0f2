//! Realtime subscriptions for the HomeWiz data platform.
//!
//! One logical subscription per `(table, event, filter)` tuple. Vendor
//! push payloads are normalized into a uniform [`event::ChangeEvent`]
//! envelope before reaching the caller's callback; dropped channels
//! reconnect with capped exponential backoff. The wire protocol itself
//! lives behind the [`transport::RealtimeTransport`] seam.

pub mod event;
pub mod manager;
pub mod transport;

pub use event::{ChangeEvent, ChangeType, EventFilter, SubscriptionSpec};
pub use manager::{ReconnectPolicy, SubscriptionId, SubscriptionManager, SubscriptionState};
pub use transport::{
    RealtimeConnection, RealtimeError, RealtimeTransport, TransportEvent, WebSocketTransport,
};
