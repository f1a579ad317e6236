//! WebSocket handlers for the status feed
//!
//! This module streams lifecycle changes and status events to connected
//! clients. Every connection starts with a snapshot, then receives each
//! broadcast message. Supports ping/pong for connection keepalive.

use crate::events::StatusEvent;
use crate::state::{AgentLifecycleState, SharedFeed};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

/// WebSocket message types for the status feed
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ChannelMessage {
    /// Full state sent on connect and after the client falls behind
    #[serde(rename = "snapshot")]
    Snapshot {
        /// Current lifecycle state
        agent_state: AgentLifecycleState,
        /// Most recent status event
        event: StatusEvent,
    },
    /// Lifecycle state change
    #[serde(rename = "agent_state_changed")]
    AgentStateChanged {
        /// New lifecycle state
        agent_state: AgentLifecycleState,
    },
    /// New status event
    #[serde(rename = "status_update")]
    StatusUpdate {
        /// The event that replaces the previous one
        event: StatusEvent,
    },
    /// Ping message for connection keepalive
    #[serde(rename = "ping")]
    Ping,
    /// Pong message responding to ping
    #[serde(rename = "pong")]
    Pong,
}

impl ChannelMessage {
    /// Encode as a JSON text frame
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a JSON text frame
    pub fn from_frame(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Shared state for the websocket route
#[derive(Clone)]
pub struct FeedSocketState {
    /// Feed to stream from
    pub feed: SharedFeed,
    /// Interval between server pings
    pub ping_interval: Duration,
}

/// WebSocket upgrade handler
///
/// Handles WebSocket connection upgrade and sets up message handlers.
///
/// # Arguments
/// * `ws` - WebSocket upgrade request
/// * `state` - Feed and keepalive settings
///
/// # Returns
/// * `Response` - HTTP response initiating WebSocket connection
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<FeedSocketState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: FeedSocketState) {
    let (mut sender, mut receiver) = socket.split();

    info!("Status feed client connected");

    // Snapshot and subscription under one lock so no update falls in between
    let (snapshot, mut updates) = {
        let feed = state.feed.read().await;
        (feed.snapshot(), feed.subscribe())
    };

    if let Err(e) = send_message(&mut sender, &snapshot).await {
        error!("Failed to send snapshot: {}", e);
        return;
    }

    let mut ping = tokio::time::interval(state.ping_interval);
    // The first tick completes immediately
    ping.tick().await;

    loop {
        tokio::select! {
            update = updates.recv() => {
                let message = match update {
                    Ok(message) => message,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Feed client lagged, resending snapshot");
                        state.feed.read().await.snapshot()
                    }
                    Err(RecvError::Closed) => break,
                };
                if let Err(e) = send_message(&mut sender, &message).await {
                    error!("Failed to send feed message: {}", e);
                    break;
                }
            }
            _ = ping.tick() => {
                if let Err(e) = send_message(&mut sender, &ChannelMessage::Ping).await {
                    error!("Failed to send ping: {}", e);
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => match ChannelMessage::from_frame(&text) {
                        Ok(ChannelMessage::Ping) => {
                            if send_message(&mut sender, &ChannelMessage::Pong).await.is_err() {
                                break;
                            }
                        }
                        Ok(ChannelMessage::Pong) => {}
                        Ok(other) => warn!("Received unhandled WebSocket message: {:?}", other),
                        Err(e) => warn!("Ignoring malformed WebSocket frame: {}", e),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Status feed client disconnected");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    info!("WebSocket connection closed");
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ChannelMessage,
) -> anyhow::Result<()> {
    let frame = message.to_frame()?;
    sender.send(Message::Text(frame)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_frame() {
        assert_eq!(ChannelMessage::Ping.to_frame().unwrap(), r#"{"type":"ping"}"#);
    }

    #[test]
    fn test_agent_state_changed_frame() {
        let frame = ChannelMessage::AgentStateChanged {
            agent_state: AgentLifecycleState::AwaitingUserInput,
        }
        .to_frame()
        .unwrap();
        assert_eq!(
            frame,
            r#"{"type":"agent_state_changed","agent_state":"awaiting_user_input"}"#
        );
    }

    #[test]
    fn test_status_update_keeps_event_type_nested() {
        let text = r#"{"type":"status_update","event":{"id":"e1","message":"Disk full","type":"error"}}"#;
        match ChannelMessage::from_frame(text).unwrap() {
            ChannelMessage::StatusUpdate { event } => {
                assert!(event.is_error());
                assert_eq!(event.id.as_deref(), Some("e1"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_frame_type_is_rejected() {
        assert!(ChannelMessage::from_frame(r#"{"type":"agent_output"}"#).is_err());
    }
}
