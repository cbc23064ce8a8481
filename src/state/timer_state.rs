//! Timer state structure and the escalation/update rules applied to it

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use super::UpdateCommand;

/// The single persisted blind-level clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Instant at which the current level ends
    #[serde(rename = "timer")]
    pub deadline: DateTime<Utc>,
    /// Length of one level, in minutes
    #[serde(rename = "interval")]
    pub interval_minutes: u32,
    #[serde(rename = "small")]
    pub small_blind: u64,
    #[serde(rename = "big")]
    pub big_blind: u64,
    /// Pause anchor; `None` while the clock is running
    #[serde(
        rename = "pausetime",
        default,
        deserialize_with = "empty_as_running",
        skip_serializing_if = "Option::is_none"
    )]
    pub paused_at: Option<DateTime<Utc>>,
}

/// `pausetime` may be absent, null or an empty string while running
fn empty_as_running<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

/// What applying an update did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Paused,
    Resumed,
    /// Pause/resume requested but the clock was already in that mode
    Unchanged,
    /// Field updates applied; `false` when every field was the zero sentinel
    Configured(bool),
}

impl UpdateOutcome {
    /// Whether the state must be written back
    pub fn needs_persist(self) -> bool {
        match self {
            Self::Paused | Self::Resumed => true,
            Self::Unchanged => false,
            Self::Configured(changed) => changed,
        }
    }
}

impl TimerState {
    /// Create a running state whose first level starts at `now`
    pub fn new(now: DateTime<Utc>, interval_minutes: u32, small_blind: u64, big_blind: u64) -> Self {
        Self {
            deadline: now + minutes(interval_minutes),
            interval_minutes,
            small_blind,
            big_blind,
            paused_at: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Time left in the current level as frozen at the pause anchor
    pub fn remaining_while_paused(&self) -> Option<Duration> {
        self.paused_at.map(|at| self.deadline - at)
    }

    /// Apply the lazy escalation check at `now`.
    ///
    /// Returns `true` when a level was escalated and the state needs to be
    /// persisted. At most one level is advanced per call, no matter how many
    /// intervals have elapsed since the deadline.
    pub fn escalate(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(remaining) = self.remaining_while_paused() {
            // Shift the frozen deadline so the remaining time stays constant.
            self.deadline = now + remaining;
            return false;
        }

        if self.deadline < now {
            self.small_blind = self.small_blind.saturating_mul(2);
            self.big_blind = self.big_blind.saturating_mul(2);
            self.deadline = now + minutes(self.interval_minutes);
            info!(
                "Level escalated to {} / {}, next level at {}",
                self.small_blind, self.big_blind, self.deadline
            );
            return true;
        }

        false
    }

    /// Apply an update command at `now`, first matching branch wins.
    ///
    /// A command carrying both `pause` and `resume` is contradictory and never
    /// matches the pause or resume branch, so it is a no-op in every state.
    pub fn apply(&mut self, cmd: &UpdateCommand, now: DateTime<Utc>) -> UpdateOutcome {
        let conflicting = cmd.pause && cmd.resume;

        if cmd.pause && !conflicting && !self.is_paused() {
            self.paused_at = Some(now);
            info!("Timer paused with {} remaining", self.deadline - now);
            return UpdateOutcome::Paused;
        }

        if cmd.resume && !conflicting {
            if let Some(remaining) = self.remaining_while_paused() {
                self.deadline = now + remaining;
                self.paused_at = None;
                info!("Timer resumed, level ends at {}", self.deadline);
                return UpdateOutcome::Resumed;
            }
        }

        if cmd.pause || cmd.resume {
            debug!("Timer already in requested mode, ignoring {:?}", cmd);
            return UpdateOutcome::Unchanged;
        }

        let mut changed = false;
        if cmd.interval_minutes != 0 {
            self.interval_minutes = cmd.interval_minutes;
            self.deadline = now + minutes(cmd.interval_minutes);
            // Changing the interval always restarts a running clock.
            self.paused_at = None;
            changed = true;
        }
        if cmd.small_blind != 0 {
            self.small_blind = cmd.small_blind;
            changed = true;
        }
        if cmd.big_blind != 0 {
            self.big_blind = cmd.big_blind;
            changed = true;
        }

        if changed {
            info!(
                "Timer configured: interval={}min, blinds {} / {}",
                self.interval_minutes, self.small_blind, self.big_blind
            );
        }
        UpdateOutcome::Configured(changed)
    }
}

fn minutes(m: u32) -> Duration {
    Duration::minutes(i64::from(m))
}
