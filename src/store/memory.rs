//! In-process backend

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::StateStore;
use crate::error::StorageError;

/// Keeps the blob in memory and counts writes
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<Vec<u8>>>,
    puts: AtomicU64,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: Vec<u8>) -> Self {
        Self {
            contents: Mutex::new(Some(contents)),
            ..Self::default()
        }
    }

    /// A store whose every `put` fails, for exercising error paths
    pub fn failing_writes(contents: Option<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(contents),
            puts: AtomicU64::new(0),
            fail_writes: true,
        }
    }

    /// Number of successful `put` calls so far
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    pub async fn snapshot(&self) -> Option<Vec<u8>> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn get(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.contents.lock().await.clone())
    }

    async fn put(&self, contents: Vec<u8>) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::other("memory store is read-only")));
        }
        *self.contents.lock().await = Some(contents);
        self.puts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
