//! Transient upload spool.
//!
//! Each upload is written under a unique name and deleted when its guard is
//! dropped, on success and failure paths alike, so the spool directory never
//! grows without bound.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Writes uploads into a spool directory as uniquely-named files.
#[derive(Clone)]
pub struct UploadSpool {
    dir: PathBuf,
}

impl UploadSpool {
    /// Create the spool, ensuring the directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Persist uploaded bytes to a spool file.
    pub async fn store(&self, bytes: &[u8]) -> Result<SpooledFile> {
        let path = self.dir.join(format!("{}.log", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Upload spooled");
        Ok(SpooledFile { path })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// A spooled upload; the backing file is removed on drop.
pub struct SpooledFile {
    path: PathBuf,
}

impl SpooledFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the upload back as text (bytes are treated as UTF-8, lossily).
    pub async fn read_to_string(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove spooled upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let spool = UploadSpool::new(dir.path()).unwrap();

        let spooled = spool.store(b"INFO boot\nINFO done").await.unwrap();
        let text = spooled.read_to_string().await.unwrap();

        assert_eq!(text, "INFO boot\nINFO done");
    }

    #[tokio::test]
    async fn test_file_is_deleted_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let spool = UploadSpool::new(dir.path()).unwrap();

        let spooled = spool.store(b"data").await.unwrap();
        let path = spooled.path().to_path_buf();
        assert!(path.exists());

        drop(spooled);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let spool = UploadSpool::new(dir.path()).unwrap();

        let spooled = spool.store(&[0x49, 0x4e, 0x46, 0x4f, 0xff]).await.unwrap();
        let text = spooled.read_to_string().await.unwrap();

        assert!(text.starts_with("INFO"));
    }
}
