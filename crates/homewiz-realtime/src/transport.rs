//! Transport seam for the vendor's realtime socket.
//!
//! The manager only sees [`TransportEvent`]s; the actual wire protocol
//! lives in the transport implementation. [`WebSocketTransport`] speaks
//! the vendor's websocket channel protocol; tests substitute a
//! channel-backed implementation.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::event::SubscriptionSpec;

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("failed to connect realtime channel: {0}")]
    Connect(String),

    #[error("realtime channel closed")]
    Closed,
}

/// What a connection can yield to the manager.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The vendor acknowledged the subscription.
    Subscribed,
    /// A raw change payload to normalize and deliver.
    Payload(Value),
    /// The channel failed and must be reconnected.
    ChannelError(String),
}

/// One open channel for one subscription tuple.
pub trait RealtimeConnection: Send + 'static {
    /// Next event, or `None` when the channel timed out / closed cleanly.
    fn next_event(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;
}

/// Connection factory; one connect per subscription and reconnect.
pub trait RealtimeTransport: Send + Sync + 'static {
    type Connection: RealtimeConnection;

    fn connect(
        &self,
        spec: &SubscriptionSpec,
    ) -> impl Future<Output = Result<Self::Connection, RealtimeError>> + Send;
}

/// Websocket transport for the hosted backend's realtime endpoint.
#[derive(Clone)]
pub struct WebSocketTransport {
    url: String,
    api_key: String,
}

impl WebSocketTransport {
    /// `url` is the backend base URL; the realtime endpoint and API key
    /// params are derived from it.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    fn socket_url(&self) -> String {
        let base = self
            .url
            .trim_end_matches('/')
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        format!("{base}/realtime/v1/websocket?apikey={}&vsn=1.0.0", self.api_key)
    }

    fn join_message(spec: &SubscriptionSpec) -> Value {
        json!({
            "topic": format!("realtime:{}", spec.table),
            "event": "phx_join",
            "ref": "1",
            "payload": {
                "config": {
                    "postgres_changes": [{
                        "event": spec.event.wire_name(),
                        "schema": "public",
                        "table": spec.table,
                        "filter": spec.filter,
                    }],
                },
            },
        })
    }
}

pub struct WebSocketConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl RealtimeTransport for WebSocketTransport {
    type Connection = WebSocketConnection;

    async fn connect(&self, spec: &SubscriptionSpec) -> Result<WebSocketConnection, RealtimeError> {
        let (mut stream, _) = connect_async(self.socket_url())
            .await
            .map_err(|err| RealtimeError::Connect(err.to_string()))?;

        let join = Self::join_message(spec);
        stream
            .send(Message::text(join.to_string()))
            .await
            .map_err(|err| RealtimeError::Connect(err.to_string()))?;

        debug!(table = %spec.table, "joined realtime channel");
        Ok(WebSocketConnection { stream })
    }
}

impl RealtimeConnection for WebSocketConnection {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        while let Some(message) = self.stream.next().await {
            let text = match message {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => {
                    return Some(TransportEvent::ChannelError("channel closed".into()));
                }
                Ok(_) => continue,
                Err(err) => return Some(TransportEvent::ChannelError(err.to_string())),
            };

            let frame: Value = match serde_json::from_str(&text) {
                Ok(frame) => frame,
                Err(_) => continue,
            };
            match frame.get("event").and_then(Value::as_str) {
                Some("phx_reply") => {
                    let ok = frame
                        .pointer("/payload/status")
                        .and_then(Value::as_str)
                        .is_some_and(|status| status == "ok");
                    if ok {
                        return Some(TransportEvent::Subscribed);
                    }
                    return Some(TransportEvent::ChannelError("join rejected".into()));
                }
                Some("postgres_changes") => {
                    // The change record sits under payload.data.
                    if let Some(data) = frame.pointer("/payload/data") {
                        return Some(TransportEvent::Payload(data.clone()));
                    }
                }
                Some("phx_error") => {
                    return Some(TransportEvent::ChannelError("channel error".into()));
                }
                // Heartbeats and presence frames are not ours.
                _ => continue,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventFilter;

    #[test]
    fn socket_url_swaps_scheme_and_carries_key() {
        let transport = WebSocketTransport::new("https://abc.backend.host", "anon");
        let url = transport.socket_url();
        assert!(url.starts_with("wss://abc.backend.host/realtime/v1/websocket"));
        assert!(url.contains("apikey=anon"));
    }

    #[test]
    fn join_message_targets_the_table_channel() {
        let spec = SubscriptionSpec::table("rooms").event(EventFilter::Insert);
        let join = WebSocketTransport::join_message(&spec);
        assert_eq!(join["topic"], "realtime:rooms");
        assert_eq!(
            join.pointer("/payload/config/postgres_changes/0/event"),
            Some(&serde_json::json!("INSERT"))
        );
    }
}
