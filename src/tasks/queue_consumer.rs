//! Queue consumer background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::{
    queue::MessageQueue,
    state::{Engine, UpdateCommand},
};

/// Result of a single polling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Empty,
    Applied,
    /// Something failed; the message, if any, stays queued for redelivery
    Failed,
}

/// Receive at most one message, apply it and acknowledge it.
///
/// Every failure is logged and reported as [`PollOutcome::Failed`].
pub async fn poll_once(engine: &Engine, queue: &dyn MessageQueue) -> PollOutcome {
    let msg = match queue.receive().await {
        Ok(Some(msg)) => msg,
        Ok(None) => return PollOutcome::Empty,
        Err(e) => {
            error!("Queue receive failed: {}", e);
            return PollOutcome::Failed;
        }
    };

    let cmd = match UpdateCommand::from_json(&msg.body) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("Leaving unparseable update {} queued: {}", msg.receipt, e);
            return PollOutcome::Failed;
        }
    };

    if let Err(e) = engine.apply_update(&cmd).await {
        error!("Failed to apply queued update {}: {}", msg.receipt, e);
        return PollOutcome::Failed;
    }

    if let Err(e) = queue.delete(&msg.receipt).await {
        error!("Failed to delete queue message {}: {}", msg.receipt, e);
        return PollOutcome::Failed;
    }

    info!("Applied queued update {}", msg.receipt);
    PollOutcome::Applied
}

/// Sequential polling loop; runs until the process shuts down
pub async fn queue_consumer_task(engine: Arc<Engine>, queue: Arc<dyn MessageQueue>, poll: Duration) {
    info!("Starting queue consumer task (poll every {:?})", poll);

    loop {
        sleep(poll).await;
        let outcome = poll_once(&engine, queue.as_ref()).await;
        debug!("Queue poll finished: {:?}", outcome);
    }
}
