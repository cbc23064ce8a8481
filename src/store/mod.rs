//! Storage adapters for the persisted timer state
//!
//! The engine only ever sees [`StateStore`]; each deployment picks a backend.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Get/put a single opaque state blob
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Human-readable location, used in logs and `NotFound` errors
    fn location(&self) -> String;

    /// Read the blob, `Ok(None)` when nothing has been written yet
    async fn get(&self) -> Result<Option<Vec<u8>>, StorageError>;

    async fn put(&self, contents: Vec<u8>) -> Result<(), StorageError>;
}
