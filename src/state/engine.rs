//! State engine: load, escalate or mutate, persist

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{TimerState, UpdateCommand};
use crate::{
    error::{ParseError, Result, StorageError},
    store::StateStore,
};

/// Read-modify-write engine over a single [`StateStore`].
///
/// Every call reads the store fresh; nothing is cached between calls. No lock
/// guards the read-modify-write sequence, so concurrent writers race and the
/// last one wins.
pub struct Engine {
    store: Arc<dyn StateStore>,
}

impl Engine {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Load the state, failing with `NotFound` if none has been written
    pub async fn load(&self) -> Result<TimerState> {
        self.load_optional()
            .await?
            .ok_or_else(|| StorageError::NotFound(self.store.location()).into())
    }

    async fn load_optional(&self) -> Result<Option<TimerState>> {
        let Some(contents) = self.store.get().await? else {
            return Ok(None);
        };
        let state = serde_json::from_slice(&contents).map_err(StorageError::Decode)?;
        Ok(Some(state))
    }

    async fn persist(&self, state: &TimerState) -> Result<()> {
        let contents = serde_json::to_vec_pretty(state).map_err(StorageError::Encode)?;
        self.store.put(contents).await?;
        Ok(())
    }

    pub async fn load_checked(&self) -> Result<TimerState> {
        self.load_checked_at(Utc::now()).await
    }

    /// Load the state and apply the escalation check at `now`, persisting only
    /// when a level was escalated
    pub async fn load_checked_at(&self, now: DateTime<Utc>) -> Result<TimerState> {
        let mut state = self.load().await?;
        if state.escalate(now) {
            self.persist(&state).await?;
        }
        Ok(state)
    }

    pub async fn apply_update(&self, cmd: &UpdateCommand) -> Result<TimerState> {
        self.apply_update_at(cmd, Utc::now()).await
    }

    /// Apply `cmd` at `now` and return the resulting state.
    ///
    /// A field update against an empty store creates the state, provided it
    /// carries interval and both blinds.
    pub async fn apply_update_at(&self, cmd: &UpdateCommand, now: DateTime<Utc>) -> Result<TimerState> {
        let mut state = match self.load_optional().await? {
            Some(state) => state,
            None if cmd.is_complete_configuration() => {
                let state = TimerState::new(now, cmd.interval_minutes, cmd.small_blind, cmd.big_blind);
                info!("Creating timer state at {}", self.store.location());
                self.persist(&state).await?;
                return Ok(state);
            }
            None if cmd.is_mode_change() => {
                return Err(StorageError::NotFound(self.store.location()).into());
            }
            None => return Err(ParseError::IncompleteInitialState.into()),
        };

        let outcome = state.apply(cmd, now);
        if outcome.needs_persist() {
            self.persist(&state).await?;
        } else {
            debug!("Update {:?} left state unchanged, skipping write", cmd);
        }
        Ok(state)
    }
}
