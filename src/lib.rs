//! Blind Timer - a poker tournament blind-level clock
//!
//! The state engine loads the single persisted timer, escalates it lazily on
//! read and applies pause/resume/configuration updates arriving from the HTTP
//! API, signed chat commands and a message queue.

pub mod api;
pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod queue;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use config::Config;
pub use error::{TimerError, Result};
pub use state::{Engine, TimerState, UpdateCommand};
pub use utils::signals::shutdown_signal;
