//! API module
//!
//! Contains HTTP request handlers for the status feed endpoints

pub mod status;

pub use status::*;
