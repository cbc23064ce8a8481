//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod queue_consumer;

// Re-export main functions
pub use queue_consumer::{poll_once, queue_consumer_task, PollOutcome};
