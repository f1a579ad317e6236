// Agent lifecycle and transport connectivity
// Discrete signals shared by the feed server and the status badge client

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Agent lifecycle state enumeration
/// Represents the current phase of an agent session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLifecycleState {
    /// Session exists but no task is running
    Idle,
    /// Runtime is being prepared
    Loading,
    /// Agent is working on a task
    Running,
    /// Agent is waiting for the user to reply
    AwaitingUserInput,
    /// Agent was paused by the user
    Paused,
    /// Agent was stopped
    Stopped,
    /// Agent completed the task
    Finished,
    /// Agent refused the task
    Rejected,
    /// Agent hit an unrecoverable error
    Error,
    /// Upstream provider is throttling the agent
    RateLimited,
    /// Agent wants confirmation before acting
    AwaitingUserConfirmation,
    /// User approved the pending action
    UserConfirmed,
    /// User rejected the pending action
    UserRejected,
}

impl AgentLifecycleState {
    /// Every lifecycle state, in declaration order
    pub const ALL: [AgentLifecycleState; 13] = [
        AgentLifecycleState::Idle,
        AgentLifecycleState::Loading,
        AgentLifecycleState::Running,
        AgentLifecycleState::AwaitingUserInput,
        AgentLifecycleState::Paused,
        AgentLifecycleState::Stopped,
        AgentLifecycleState::Finished,
        AgentLifecycleState::Rejected,
        AgentLifecycleState::Error,
        AgentLifecycleState::RateLimited,
        AgentLifecycleState::AwaitingUserConfirmation,
        AgentLifecycleState::UserConfirmed,
        AgentLifecycleState::UserRejected,
    ];

    /// Position of the state within [`AgentLifecycleState::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name of the state (matches the serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            AgentLifecycleState::Idle => "idle",
            AgentLifecycleState::Loading => "loading",
            AgentLifecycleState::Running => "running",
            AgentLifecycleState::AwaitingUserInput => "awaiting_user_input",
            AgentLifecycleState::Paused => "paused",
            AgentLifecycleState::Stopped => "stopped",
            AgentLifecycleState::Finished => "finished",
            AgentLifecycleState::Rejected => "rejected",
            AgentLifecycleState::Error => "error",
            AgentLifecycleState::RateLimited => "rate_limited",
            AgentLifecycleState::AwaitingUserConfirmation => "awaiting_user_confirmation",
            AgentLifecycleState::UserConfirmed => "user_confirmed",
            AgentLifecycleState::UserRejected => "user_rejected",
        }
    }
}

impl fmt::Display for AgentLifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown lifecycle state name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown agent lifecycle state: {0}")]
pub struct UnknownLifecycleState(pub String);

impl FromStr for AgentLifecycleState {
    type Err = UnknownLifecycleState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        AgentLifecycleState::ALL
            .into_iter()
            .find(|state| state.as_str() == name)
            .ok_or_else(|| UnknownLifecycleState(s.to_string()))
    }
}

/// Connectivity of the live event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityStatus {
    /// Channel is established and delivering events
    Connected,
    /// Channel is down (never connected, or lost)
    Disconnected,
}

impl ConnectivityStatus {
    /// Whether the channel is established
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectivityStatus::Connected)
    }
}
