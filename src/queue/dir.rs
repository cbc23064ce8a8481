//! Spool-directory queue: each `*.json` file is one message

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use super::{MessageQueue, QueueError, QueueMessage};

/// Messages are delivered in file name order; deleting removes the file.
///
/// Each `receive` resumes after the last receipt handed out and wraps around,
/// so an unacknowledged message is redelivered only after every other pending
/// message has had a turn.
#[derive(Debug)]
pub struct DirQueue {
    dir: PathBuf,
    last_delivered: Mutex<Option<String>>,
}

impl DirQueue {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_delivered: Mutex::new(None),
        }
    }

    /// Fail early if the spool directory is missing
    pub async fn check_available(&self) -> Result<(), QueueError> {
        let meta = fs::metadata(&self.dir).await?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(QueueError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a directory", self.dir.display()),
            )))
        }
    }

    async fn pending(&self) -> Result<Vec<String>, QueueError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") && !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn message_path(&self, receipt: &str) -> Result<PathBuf, QueueError> {
        if receipt.contains(['/', '\\']) || receipt.starts_with('.') {
            return Err(QueueError::UnknownReceipt(receipt.to_string()));
        }
        Ok(self.dir.join(receipt))
    }
}

#[async_trait]
impl MessageQueue for DirQueue {
    async fn receive(&self) -> Result<Option<QueueMessage>, QueueError> {
        let pending = self.pending().await?;
        let mut last = self.last_delivered.lock().await;
        let next = match last.as_deref() {
            Some(prev) => pending.iter().find(|name| name.as_str() > prev),
            None => None,
        };
        let Some(receipt) = next.or_else(|| pending.first()).cloned() else {
            *last = None;
            return Ok(None);
        };
        *last = Some(receipt.clone());
        drop(last);

        let body = fs::read(self.dir.join(&receipt)).await?;
        debug!("Received queue message {}", receipt);
        Ok(Some(QueueMessage { receipt, body }))
    }

    async fn delete(&self, receipt: &str) -> Result<(), QueueError> {
        match fs::remove_file(self.message_path(receipt)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(QueueError::UnknownReceipt(receipt.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_name_order_and_rotates_unacknowledged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("002.json"), b"{\"pause\":true}").unwrap();
        std::fs::write(dir.path().join("001.json"), b"{\"small\":5}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        let queue = DirQueue::new(dir.path());

        let first = queue.receive().await.unwrap().unwrap();
        assert_eq!(first.receipt, "001.json");
        // 001 is still pending, but 002 gets its turn before it comes back
        let second = queue.receive().await.unwrap().unwrap();
        assert_eq!(second.receipt, "002.json");
        assert_eq!(second.body, b"{\"pause\":true}".to_vec());
        assert_eq!(queue.receive().await.unwrap().unwrap(), first);

        queue.delete(&first.receipt).await.unwrap();
        queue.delete(&second.receipt).await.unwrap();
        assert!(queue.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn single_pending_message_is_redelivered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("001.json"), b"{}").unwrap();
        let queue = DirQueue::new(dir.path());

        let first = queue.receive().await.unwrap().unwrap();
        assert_eq!(queue.receive().await.unwrap().unwrap(), first);
    }

    #[tokio::test]
    async fn delete_rejects_unknown_and_escaping_receipts() {
        let dir = tempfile::tempdir().unwrap();
        let queue = DirQueue::new(dir.path());
        assert!(matches!(
            queue.delete("missing.json").await,
            Err(QueueError::UnknownReceipt(_))
        ));
        assert!(matches!(
            queue.delete("../state.json").await,
            Err(QueueError::UnknownReceipt(_))
        ));
    }

    #[tokio::test]
    async fn missing_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirQueue::new(dir.path().join("absent")).check_available().await.is_err());
        assert!(DirQueue::new(dir.path()).check_available().await.is_ok());
    }
}
