//! State management module
//!
//! This module contains the persisted timer state, the update command and the
//! engine that moves state between them and the store.

pub mod engine;
pub mod timer_state;
pub mod update;

// Re-export main types
pub use engine::Engine;
pub use timer_state::{TimerState, UpdateOutcome};
pub use update::UpdateCommand;
