// Status feed state
// Owns the authoritative agent state and current status event, and fans out changes

use super::lifecycle::AgentLifecycleState;
use crate::events::StatusEvent;
use crate::websocket::ChannelMessage;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;

/// Main feed state
/// Holds the latest lifecycle state and status event for the agent session
#[derive(Debug)]
pub struct FeedState {
    /// Current lifecycle state
    agent_state: AgentLifecycleState,
    /// Most recent status event (replaced, never accumulated)
    current_event: StatusEvent,
    /// Time of the last change to either signal
    updated_at: DateTime<Utc>,
    /// Fan-out channel for connected websocket clients
    tx: broadcast::Sender<ChannelMessage>,
}

impl FeedState {
    /// Create a new feed state
    ///
    /// # Arguments
    /// * `initial_state` - Lifecycle state reported before any update arrives
    /// * `capacity` - Broadcast buffer size per subscriber
    pub fn new(initial_state: AgentLifecycleState, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            agent_state: initial_state,
            current_event: StatusEvent::default(),
            updated_at: Utc::now(),
            tx,
        }
    }

    /// Current lifecycle state
    pub fn agent_state(&self) -> AgentLifecycleState {
        self.agent_state
    }

    /// Most recent status event
    pub fn current_event(&self) -> &StatusEvent {
        &self.current_event
    }

    /// Time of the last change
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Update the lifecycle state
    /// Returns true (and broadcasts) only if the state actually changed
    pub fn set_agent_state(&mut self, state: AgentLifecycleState) -> bool {
        if self.agent_state == state {
            return false;
        }
        self.agent_state = state;
        self.updated_at = Utc::now();
        self.broadcast(ChannelMessage::AgentStateChanged { agent_state: state });
        true
    }

    /// Replace the current status event and broadcast it
    pub fn publish_event(&mut self, event: StatusEvent) {
        self.current_event = event.clone();
        self.updated_at = Utc::now();
        self.broadcast(ChannelMessage::StatusUpdate { event });
    }

    /// Full snapshot message for newly connected clients
    pub fn snapshot(&self) -> ChannelMessage {
        ChannelMessage::Snapshot {
            agent_state: self.agent_state,
            event: self.current_event.clone(),
        }
    }

    /// Subscribe to future feed messages
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.tx.subscribe()
    }

    /// Number of connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn broadcast(&self, message: ChannelMessage) {
        // No subscribers is not an error: the snapshot covers late joiners
        if self.tx.send(message).is_err() {
            debug!("No feed subscribers connected");
        }
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(AgentLifecycleState::Loading, 64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_state_creation() {
        let feed = FeedState::default();
        assert_eq!(feed.agent_state(), AgentLifecycleState::Loading);
        assert_eq!(feed.current_event(), &StatusEvent::default());
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn test_set_agent_state_broadcasts_changes_only() {
        let mut feed = FeedState::default();
        let mut rx = feed.subscribe();

        assert!(!feed.set_agent_state(AgentLifecycleState::Loading));
        assert!(feed.set_agent_state(AgentLifecycleState::Running));

        assert_eq!(
            rx.try_recv().unwrap(),
            ChannelMessage::AgentStateChanged {
                agent_state: AgentLifecycleState::Running
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_publish_event_replaces_previous() {
        let mut feed = FeedState::default();
        let mut rx = feed.subscribe();

        feed.publish_event(StatusEvent::new("a", "first"));
        feed.publish_event(StatusEvent::new("b", "second"));

        assert_eq!(feed.current_event().id.as_deref(), Some("b"));
        assert!(matches!(rx.try_recv().unwrap(), ChannelMessage::StatusUpdate { .. }));
        assert!(matches!(rx.try_recv().unwrap(), ChannelMessage::StatusUpdate { event } if event.id.as_deref() == Some("b")));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let mut feed = FeedState::default();
        feed.publish_event(StatusEvent::new("a", "first"));
        assert_eq!(feed.current_event().message.as_deref(), Some("first"));
    }

    #[test]
    fn test_snapshot_reflects_current_signals() {
        let mut feed = FeedState::new(AgentLifecycleState::Idle, 4);
        feed.publish_event(StatusEvent::new("STATUS$STARTING_RUNTIME", "Starting"));

        match feed.snapshot() {
            ChannelMessage::Snapshot { agent_state, event } => {
                assert_eq!(agent_state, AgentLifecycleState::Idle);
                assert_eq!(event.id.as_deref(), Some("STATUS$STARTING_RUNTIME"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
