//! Implements ImageStorePort. Writes screenshots as `{dir}/{id}.png`.
//! The directory is created on first write; an existing file with the same id is replaced.

use crate::domain::DomainError;
use crate::ports::ImageStorePort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// File-system screenshot store. No read-back, no cleanup.
pub struct FsImageStore {
    base_dir: PathBuf,
}

impl FsImageStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn image_path(&self, id: &str) -> Result<PathBuf, DomainError> {
        // Post ids are numeric; anything path-like would escape the directory.
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(DomainError::Storage(format!("invalid image id {:?}", id)));
        }
        Ok(self.base_dir.join(format!("{}.png", id)))
    }
}

#[async_trait::async_trait]
impl ImageStorePort for FsImageStore {
    async fn save_png(&self, id: &str, bytes: &[u8]) -> Result<PathBuf, DomainError> {
        let path = self.image_path(id)?;
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let mut f = fs::File::create(&path)
            .await
            .map_err(|e| DomainError::Storage(format!("create {}: {}", path.display(), e)))?;
        f.write_all(bytes)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        f.flush()
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let abs_path = path.canonicalize().unwrap_or_else(|_| path.clone());
        info!(path = %abs_path.display(), bytes = bytes.len(), "saved screenshot to disk");
        Ok(path)
    }
}
