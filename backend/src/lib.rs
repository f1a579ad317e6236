//! Agent Status Backend Library
//!
//! Shared lifecycle and status event types, plus the status feed server
//! modules. The server binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
/// Lifecycle signals and feed state
///
/// Holds the authoritative agent state and the latest status event.
pub mod state;
pub mod websocket;
