//! Change-event envelope and vendor payload normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of row change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Insert,
    Update,
    Delete,
}

/// Which change kinds a subscription wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Insert,
    Update,
    Delete,
}

impl EventFilter {
    pub fn matches(self, change: ChangeType) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Insert => change == ChangeType::Insert,
            EventFilter::Update => change == ChangeType::Update,
            EventFilter::Delete => change == ChangeType::Delete,
        }
    }

    /// Wire form used when joining a vendor channel.
    pub fn wire_name(self) -> &'static str {
        match self {
            EventFilter::All => "*",
            EventFilter::Insert => "INSERT",
            EventFilter::Update => "UPDATE",
            EventFilter::Delete => "DELETE",
        }
    }
}

/// The `(table, event, filter)` tuple identifying one logical
/// subscription. `filter` is passed through to the vendor verbatim
/// (e.g. `building_id=eq.BLDG_001`).
#[derive(Debug, Clone)]
pub struct SubscriptionSpec {
    pub table: String,
    pub event: EventFilter,
    pub filter: Option<String>,
}

impl SubscriptionSpec {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            event: EventFilter::All,
            filter: None,
        }
    }

    pub fn event(mut self, event: EventFilter) -> Self {
        self.event = event;
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Normalized change event delivered to subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub event_type: ChangeType,
    pub table: String,
    pub old: Option<Value>,
    pub new: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// Normalize a vendor `postgres_changes` payload
/// (`{eventType, table, old, new, commit_timestamp?}`). Returns `None`
/// for payloads that do not describe a row change.
pub fn normalize(payload: &Value) -> Option<ChangeEvent> {
    let event_type = match payload.get("eventType").and_then(Value::as_str)? {
        "INSERT" => ChangeType::Insert,
        "UPDATE" => ChangeType::Update,
        "DELETE" => ChangeType::Delete,
        _ => return None,
    };
    let table = payload.get("table").and_then(Value::as_str)?.to_string();

    let record = |key: &str| {
        payload
            .get(key)
            .filter(|value| !value.is_null())
            .filter(|value| value.as_object().is_none_or(|object| !object.is_empty()))
            .cloned()
    };

    let timestamp = payload
        .get("commit_timestamp")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Some(ChangeEvent {
        event_type,
        table,
        old: record("old"),
        new: record("new"),
        timestamp,
    })
}
