//! Message queue boundary for the consumer loop

pub mod dir;

use async_trait::async_trait;

pub use dir::DirQueue;

/// One received message, acknowledged by passing `receipt` back to `delete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub receipt: String,
    pub body: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown receipt {0}")]
    UnknownReceipt(String),
}

#[async_trait]
pub trait MessageQueue: Send + Sync + 'static {
    /// Receive at most one message, `Ok(None)` when the queue is empty
    async fn receive(&self) -> Result<Option<QueueMessage>, QueueError>;

    /// Acknowledge a message so it is not redelivered
    async fn delete(&self, receipt: &str) -> Result<(), QueueError>;
}
