//! Status feed API handlers
//!
//! HTTP endpoints that read and update the feed's lifecycle state and
//! current status event. Updates are broadcast to websocket subscribers.

use crate::error::AppError;
use crate::events::StatusEvent;
use crate::state::{AgentLifecycleState, SharedFeed};
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Current feed signals
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusSnapshotResponse {
    /// Current lifecycle state
    pub agent_state: AgentLifecycleState,
    /// Most recent status event
    pub event: StatusEvent,
    /// Time of the last change
    pub updated_at: DateTime<Utc>,
    /// Number of connected websocket clients
    pub subscribers: usize,
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator (e.g., "ok", "unchanged")
    pub status: String,
}

/// Lifecycle update request
#[derive(Debug, Deserialize)]
pub struct AgentStateRequest {
    /// New lifecycle state
    pub agent_state: AgentLifecycleState,
}

/// GET /api/status - Current lifecycle state and status event
pub async fn get_status(
    State(feed): State<SharedFeed>,
) -> Result<Json<StatusSnapshotResponse>, AppError> {
    let feed = feed.read().await;
    Ok(Json(StatusSnapshotResponse {
        agent_state: feed.agent_state(),
        event: feed.current_event().clone(),
        updated_at: feed.updated_at(),
        subscribers: feed.subscriber_count(),
    }))
}

/// PUT /api/agent-state - Update the lifecycle state
pub async fn set_agent_state(
    State(feed): State<SharedFeed>,
    Json(request): Json<AgentStateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let changed = feed.write().await.set_agent_state(request.agent_state);

    if changed {
        info!(agent_state = %request.agent_state, "Agent lifecycle state changed");
    }

    Ok(Json(MessageResponse {
        message: format!("Agent state is {}", request.agent_state),
        status: if changed { "ok" } else { "unchanged" }.to_string(),
    }))
}

/// POST /api/status-events - Publish a status event
pub async fn publish_status_event(
    State(feed): State<SharedFeed>,
    Json(event): Json<StatusEvent>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if event.is_blank() {
        return Err(AppError::InvalidStatusEvent(
            "event must carry an id, a message or a type".to_string(),
        ));
    }

    info!(
        event_id = event.id.as_deref().unwrap_or(""),
        event_type = event.event_type.as_deref().unwrap_or(""),
        "Publishing status event"
    );

    let message = match &event.id {
        Some(id) => format!("Published status event {}", id),
        None => "Published status event".to_string(),
    };
    feed.write().await.publish_event(event);

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message,
            status: "ok".to_string(),
        }),
    ))
}
