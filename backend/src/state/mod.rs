// State management module
// Handles lifecycle signals and the status feed state

/// Current agent state and event, with change broadcast
pub mod feed;
/// Lifecycle and connectivity signal types
pub mod lifecycle;

pub use feed::FeedState;
pub use lifecycle::{AgentLifecycleState, ConnectivityStatus, UnknownLifecycleState};

/// Feed state shared between HTTP handlers and websocket connections
pub type SharedFeed = std::sync::Arc<tokio::sync::RwLock<FeedState>>;
