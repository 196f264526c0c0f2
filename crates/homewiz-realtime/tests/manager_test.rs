//! Subscription manager tests over a channel-backed mock transport.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use homewiz_realtime::{
    ChangeEvent, ChangeType, EventFilter, RealtimeConnection, RealtimeError, RealtimeTransport,
    ReconnectPolicy, SubscriptionManager, SubscriptionSpec, SubscriptionState, TransportEvent,
};

/// Transport that hands out pre-scripted connections in order; a connect
/// beyond the script fails. State is shared so tests can keep a handle
/// after the manager takes ownership of the transport.
struct MockState {
    connections: Mutex<VecDeque<mpsc::UnboundedReceiver<TransportEvent>>>,
    connects: AtomicU32,
}

#[derive(Clone)]
struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    fn scripted(receivers: Vec<mpsc::UnboundedReceiver<TransportEvent>>) -> (Self, Arc<MockState>) {
        let state = Arc::new(MockState {
            connections: Mutex::new(receivers.into()),
            connects: AtomicU32::new(0),
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

struct MockConnection {
    rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl RealtimeConnection for MockConnection {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        self.rx.recv().await
    }
}

impl RealtimeTransport for MockTransport {
    type Connection = MockConnection;

    async fn connect(&self, _spec: &SubscriptionSpec) -> Result<MockConnection, RealtimeError> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        match self.state.connections.lock().unwrap().pop_front() {
            Some(rx) => Ok(MockConnection { rx }),
            None => Err(RealtimeError::Connect("no scripted connection".into())),
        }
    }
}

fn collector() -> (Arc<Mutex<Vec<ChangeEvent>>>, impl Fn(ChangeEvent) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |event| sink.lock().unwrap().push(event))
}

fn fast_policy(max_attempts: u32) -> ReconnectPolicy {
    ReconnectPolicy {
        base_delay: Duration::from_millis(1),
        max_attempts,
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

#[tokio::test]
async fn delivers_normalized_events_after_ack() {
    let (tx, rx) = mpsc::unbounded_channel();
    let (transport, _state) = MockTransport::scripted(vec![rx]);
    let manager = SubscriptionManager::with_policy(transport, fast_policy(5));

    let (seen, callback) = collector();
    let id = manager.subscribe(SubscriptionSpec::table("buildings"), callback);

    tx.send(TransportEvent::Subscribed).unwrap();
    tx.send(TransportEvent::Payload(json!({
        "eventType": "INSERT",
        "table": "buildings",
        "new": {"building_id": "BLDG_001"},
    })))
    .unwrap();
    settle().await;

    assert_eq!(manager.state(id), Some(SubscriptionState::Subscribed));
    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, ChangeType::Insert);
    assert_eq!(events[0].table, "buildings");
    assert!(events[0].new.is_some());
}

#[tokio::test]
async fn event_filter_drops_non_matching_changes() {
    let (tx, rx) = mpsc::unbounded_channel();
    let (transport, _state) = MockTransport::scripted(vec![rx]);
    let manager = SubscriptionManager::with_policy(transport, fast_policy(5));

    let (seen, callback) = collector();
    manager.subscribe(
        SubscriptionSpec::table("rooms").event(EventFilter::Update),
        callback,
    );

    tx.send(TransportEvent::Subscribed).unwrap();
    tx.send(TransportEvent::Payload(json!({
        "eventType": "INSERT",
        "table": "rooms",
        "new": {"room_id": "ROOM_001"},
    })))
    .unwrap();
    tx.send(TransportEvent::Payload(json!({
        "eventType": "UPDATE",
        "table": "rooms",
        "old": {"room_id": "ROOM_001", "status": "AVAILABLE"},
        "new": {"room_id": "ROOM_001", "status": "OCCUPIED"},
    })))
    .unwrap();
    settle().await;

    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, ChangeType::Update);
}

#[tokio::test]
async fn other_tables_are_filtered_out() {
    let (tx, rx) = mpsc::unbounded_channel();
    let (transport, _state) = MockTransport::scripted(vec![rx]);
    let manager = SubscriptionManager::with_policy(transport, fast_policy(5));

    let (seen, callback) = collector();
    manager.subscribe(SubscriptionSpec::table("tenants"), callback);

    tx.send(TransportEvent::Subscribed).unwrap();
    tx.send(TransportEvent::Payload(json!({
        "eventType": "DELETE",
        "table": "leads",
        "old": {"lead_id": "LEAD_001"},
    })))
    .unwrap();
    settle().await;

    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reconnects_after_channel_error() {
    let (tx1, rx1) = mpsc::unbounded_channel();
    let (tx2, rx2) = mpsc::unbounded_channel();
    let (transport, state) = MockTransport::scripted(vec![rx1, rx2]);
    let manager = SubscriptionManager::with_policy(transport, fast_policy(5));

    let (seen, callback) = collector();
    let id = manager.subscribe(SubscriptionSpec::table("buildings"), callback);

    tx1.send(TransportEvent::Subscribed).unwrap();
    tx1.send(TransportEvent::ChannelError("socket dropped".into()))
        .unwrap();
    settle().await;

    tx2.send(TransportEvent::Subscribed).unwrap();
    tx2.send(TransportEvent::Payload(json!({
        "eventType": "INSERT",
        "table": "buildings",
        "new": {"building_id": "BLDG_002"},
    })))
    .unwrap();
    settle().await;

    assert_eq!(state.connects.load(Ordering::SeqCst), 2);
    assert_eq!(manager.state(id), Some(SubscriptionState::Subscribed));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn abandons_after_reconnect_cap() {
    // No scripted connections: every connect fails.
    let (transport, state) = MockTransport::scripted(vec![]);
    let manager = SubscriptionManager::with_policy(transport, fast_policy(3));

    let (_seen, callback) = collector();
    let id = manager.subscribe(SubscriptionSpec::table("buildings"), callback);
    settle().await;

    assert_eq!(state.connects.load(Ordering::SeqCst), 3);
    assert_eq!(manager.state(id), Some(SubscriptionState::ChannelError));
}

#[tokio::test]
async fn unsubscribe_is_terminal() {
    let (tx, rx) = mpsc::unbounded_channel();
    let (transport, _state) = MockTransport::scripted(vec![rx]);
    let manager = SubscriptionManager::with_policy(transport, fast_policy(5));

    let (_seen, callback) = collector();
    let id = manager.subscribe(SubscriptionSpec::table("buildings"), callback);
    tx.send(TransportEvent::Subscribed).unwrap();
    settle().await;

    assert!(manager.unsubscribe(id));
    assert!(!manager.unsubscribe(id));
    assert_eq!(manager.state(id), None);
    assert_eq!(manager.active_count(), 0);
}
