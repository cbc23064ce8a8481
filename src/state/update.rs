//! Transient update command shared by every write channel

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A requested change to the timer. Zero means "leave unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCommand {
    pub pause: bool,
    pub resume: bool,
    #[serde(rename = "interval")]
    pub interval_minutes: u32,
    #[serde(rename = "small")]
    pub small_blind: u64,
    #[serde(rename = "big")]
    pub big_blind: u64,
}

impl UpdateCommand {
    pub fn pause() -> Self {
        Self {
            pause: true,
            ..Self::default()
        }
    }

    pub fn resume() -> Self {
        Self {
            resume: true,
            ..Self::default()
        }
    }

    /// Both flags set; resolves to a no-op in the engine
    pub fn toggle() -> Self {
        Self {
            pause: true,
            resume: true,
            ..Self::default()
        }
    }

    pub fn blinds(small_blind: u64, big_blind: u64) -> Self {
        Self {
            small_blind,
            big_blind,
            ..Self::default()
        }
    }

    /// Decode the structured JSON shape used by the API and the queue
    pub fn from_json(body: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(body).map_err(|e| ParseError::Body(e.to_string()))
    }

    pub fn is_mode_change(&self) -> bool {
        self.pause || self.resume
    }

    /// Whether this command carries enough to create a state from nothing
    pub fn is_complete_configuration(&self) -> bool {
        !self.is_mode_change()
            && self.interval_minutes != 0
            && self.small_blind != 0
            && self.big_blind != 0
    }
}
