//! Local file backend

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::StateStore;
use crate::error::StorageError;

/// Stores the state document in a single file, written via a temp file and rename
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fail early if the file's directory cannot hold the state
    pub async fn check_writable(&self) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let meta = fs::metadata(&dir).await?;
        if !meta.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a directory", dir.display()),
            )));
        }
        if meta.permissions().readonly() {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::PermissionDenied,
                format!("{} is read-only", dir.display()),
            )));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for FileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn get(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, contents: Vec<u8>) -> Result<(), StorageError> {
        let tmp = self.temp_path();
        fs::write(&tmp, &contents).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        assert!(store.get().await.unwrap().is_none());
        store.check_writable().await.unwrap();
    }

    #[tokio::test]
    async fn put_then_get_returns_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        store.put(b"{\"a\":1}".to_vec()).await.unwrap();
        store.put(b"{\"a\":2}".to_vec()).await.unwrap();
        assert_eq!(store.get().await.unwrap().unwrap(), b"{\"a\":2}".to_vec());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn missing_directory_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope").join("state.json"));
        assert!(store.check_writable().await.is_err());
    }
}
