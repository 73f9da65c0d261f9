use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tempfile::{NamedTempFile, TempDir};
use thiserror::Error;
use uploader_logging::{uploader_debug, uploader_warn};
use url::Url;

use crate::DownloadId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("download directory unavailable: {0}")]
    DownloadDir(String),
    #[error("unknown download {0}")]
    Unknown(DownloadId),
    #[error("no file URL for {0:?}")]
    NotAddressable(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A response payload written to local disk and addressable by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDownload {
    pub id: DownloadId,
    pub suggested_name: String,
    pub path: PathBuf,
    pub url: Url,
    pub byte_len: u64,
    pub content_type: Option<String>,
}

/// Owns every materialized download. Each one lives in its own directory
/// under a private temp root, which disappears when the store is dropped.
pub struct DownloadStore {
    root: TempDir,
    next_id: AtomicU64,
    entries: Mutex<HashMap<DownloadId, StoredDownload>>,
}

impl DownloadStore {
    pub fn new(parent: Option<&Path>) -> Result<Self, StoreError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("uploader-downloads-");
        let root = match parent {
            Some(dir) => {
                // File URLs need an absolute path.
                fs::create_dir_all(dir)
                    .and_then(|()| fs::canonicalize(dir))
                    .and_then(|dir| builder.tempdir_in(dir))
            }
            None => builder.tempdir(),
        }
        .map_err(|e| StoreError::DownloadDir(e.to_string()))?;

        Ok(Self {
            root,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Writes `bytes` to `{root}/{id}/{suggested_name}` via a temp file and rename.
    pub fn materialize(
        &self,
        suggested_name: &str,
        bytes: &[u8],
        content_type: Option<String>,
    ) -> Result<StoredDownload, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let dir = self.root.path().join(id.to_string());
        fs::create_dir_all(&dir)?;

        let target = dir.join(suggested_name);
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;

        let url = Url::from_file_path(&target)
            .map_err(|()| StoreError::NotAddressable(target.clone()))?;
        let stored = StoredDownload {
            id,
            suggested_name: suggested_name.to_string(),
            path: target,
            url,
            byte_len: bytes.len() as u64,
            content_type,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, stored.clone());
        uploader_debug!("Materialized download {} at {}", id, stored.url);
        Ok(stored)
    }

    pub fn get(&self, id: DownloadId) -> Option<StoredDownload> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes the download's local copy. Its URL stops resolving.
    pub fn revoke(&self, id: DownloadId) -> Result<(), StoreError> {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(StoreError::Unknown(id))?;
        if let Some(dir) = removed.path.parent() {
            if let Err(err) = fs::remove_dir_all(dir) {
                uploader_warn!("Failed to remove download dir {:?}: {}", dir, err);
                return Err(err.into());
            }
        }
        uploader_debug!("Revoked download {}", id);
        Ok(())
    }

    /// Copies a download to `destination`, replacing any existing file.
    pub fn save_to(&self, id: DownloadId, destination: &Path) -> Result<PathBuf, StoreError> {
        let stored = self.get(id).ok_or(StoreError::Unknown(id))?;
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&stored.path, destination)?;
        Ok(destination.to_path_buf())
    }
}
