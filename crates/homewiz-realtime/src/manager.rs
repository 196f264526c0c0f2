//! Subscription manager.
//!
//! Per-subscription lifecycle:
//! CREATED -> SUBSCRIBED -> {CHANNEL_ERROR | TIMED_OUT} -> backoff
//! reconnect -> SUBSCRIBED, or CLOSED (terminal, explicit unsubscribe).
//! Reconnection is capped; an exhausted subscription is abandoned and
//! must be recreated by the caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::event::{normalize, ChangeEvent, SubscriptionSpec};
use crate::transport::{RealtimeConnection, RealtimeTransport, TransportEvent};

pub type SubscriptionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionState {
    Created,
    Subscribed,
    ChannelError,
    TimedOut,
    Closed,
}

/// Reconnect backoff: `base_delay * 2^(attempt-1)`, capped attempts.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

struct SubscriptionEntry {
    state: Arc<Mutex<SubscriptionState>>,
    driver: JoinHandle<()>,
}

/// Owns every live subscription and its driver task.
pub struct SubscriptionManager<T: RealtimeTransport> {
    transport: Arc<T>,
    policy: ReconnectPolicy,
    subscriptions: Mutex<HashMap<SubscriptionId, SubscriptionEntry>>,
}

impl<T: RealtimeTransport> SubscriptionManager<T> {
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, ReconnectPolicy::default())
    }

    pub fn with_policy(transport: T, policy: ReconnectPolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            policy,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    /// Open one logical subscription; the callback receives normalized
    /// events matching the subscription's event filter.
    pub fn subscribe<F>(&self, spec: SubscriptionSpec, callback: F) -> SubscriptionId
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        let state = Arc::new(Mutex::new(SubscriptionState::Created));

        let driver = tokio::spawn(drive(
            Arc::clone(&self.transport),
            spec,
            callback,
            Arc::clone(&state),
            self.policy.clone(),
        ));

        self.lock()
            .insert(id, SubscriptionEntry { state, driver });
        debug!(subscription_id = %id, "subscription created");
        id
    }

    /// Tear down a subscription. Returns false for unknown ids.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let entry = self.lock().remove(&id);
        match entry {
            Some(entry) => {
                set_state(&entry.state, SubscriptionState::Closed);
                entry.driver.abort();
                debug!(subscription_id = %id, "subscription closed");
                true
            }
            None => false,
        }
    }

    pub fn state(&self, id: SubscriptionId) -> Option<SubscriptionState> {
        self.lock().get(&id).map(|entry| {
            match entry.state.lock() {
                Ok(guard) => *guard,
                Err(poisoned) => *poisoned.into_inner(),
            }
        })
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SubscriptionId, SubscriptionEntry>> {
        match self.subscriptions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn set_state(slot: &Mutex<SubscriptionState>, next: SubscriptionState) {
    let mut guard = match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = next;
}

/// Drives one subscription: connect, pump events, reconnect with backoff
/// on failure, abandon after the attempt cap.
async fn drive<T, F>(
    transport: Arc<T>,
    spec: SubscriptionSpec,
    callback: F,
    state: Arc<Mutex<SubscriptionState>>,
    policy: ReconnectPolicy,
) where
    T: RealtimeTransport,
    F: Fn(ChangeEvent) + Send + Sync + 'static,
{
    let mut failures = 0u32;
    loop {
        match transport.connect(&spec).await {
            Ok(mut connection) => {
                loop {
                    match connection.next_event().await {
                        Some(TransportEvent::Subscribed) => {
                            set_state(&state, SubscriptionState::Subscribed);
                            failures = 0;
                            debug!(table = %spec.table, "subscription acknowledged");
                        }
                        Some(TransportEvent::Payload(payload)) => {
                            if let Some(event) = normalize(&payload) {
                                if event.table == spec.table && spec.event.matches(event.event_type)
                                {
                                    callback(event);
                                }
                            }
                        }
                        Some(TransportEvent::ChannelError(reason)) => {
                            warn!(table = %spec.table, %reason, "realtime channel error");
                            set_state(&state, SubscriptionState::ChannelError);
                            break;
                        }
                        None => {
                            set_state(&state, SubscriptionState::TimedOut);
                            break;
                        }
                    }
                }
            }
            Err(err) => {
                warn!(table = %spec.table, error = %err, "realtime connect failed");
                set_state(&state, SubscriptionState::ChannelError);
            }
        }

        failures += 1;
        if failures >= policy.max_attempts {
            warn!(
                table = %spec.table,
                attempts = failures,
                "reconnect attempts exhausted, abandoning subscription"
            );
            return;
        }
        let delay = policy.base_delay * 2u32.saturating_pow(failures.saturating_sub(1));
        tokio::time::sleep(delay).await;
    }
}
