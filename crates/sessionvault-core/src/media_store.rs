//! Media store abstraction.
//!
//! The session manager only needs one capability from media hosting: take a
//! file that has been staged on local disk and return a public URL for it.
//! Backends can be swapped without touching registration logic.
//!
//! # Example
//!
//! ```ignore
//! use sessionvault_core::media_store::{LocalMediaStore, MediaStore};
//! use std::path::PathBuf;
//!
//! let store = LocalMediaStore::new(
//!     PathBuf::from("./public/media"),
//!     "http://localhost:8001/media".to_string(),
//! );
//!
//! let url = store.upload(staged.path()).await?;
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Boxed future returned by [`MediaStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract trait for media hosting backends.
pub trait MediaStore: Send + Sync {
    /// Upload the file at `local_path` and return its public URL.
    ///
    /// The local file is left in place; removing it is the caller's job.
    fn upload<'a>(&'a self, local_path: &'a Path) -> StoreFuture<'a, String>;
}

/// Error type for media store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local filesystem media store.
///
/// Copies uploads under `media_dir` with a random key and serves them from
/// `base_url`.
#[derive(Clone, Debug)]
pub struct LocalMediaStore {
    media_dir: PathBuf,
    base_url: String,
    max_file_size: u64,
}

impl LocalMediaStore {
    pub fn new(media_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(media_dir, base_url, 5 * 1024 * 1024)
    }

    pub fn with_max_size(media_dir: PathBuf, base_url: String, max_file_size: u64) -> Self {
        Self {
            media_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Build a storage key from a fresh UUID and the source file's extension.
    fn key_for(local_path: &Path) -> Result<String, StorageError> {
        let id = Uuid::new_v4();
        match local_path.extension().and_then(|e| e.to_str()) {
            None => Ok(id.to_string()),
            Some(ext) => {
                Self::validate_extension(ext)?;
                Ok(format!("{}.{}", id, ext.to_ascii_lowercase()))
            }
        }
    }

    fn validate_extension(ext: &str) -> Result<(), StorageError> {
        if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StorageError::InvalidKey(format!(
                "unsupported file extension '{}'",
                ext
            )));
        }
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

impl MediaStore for LocalMediaStore {
    fn upload<'a>(&'a self, local_path: &'a Path) -> StoreFuture<'a, String> {
        Box::pin(async move {
            let size = fs::metadata(local_path).await?.len();
            if size == 0 {
                return Err(StorageError::EmptyFile);
            }
            if size > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let key = Self::key_for(local_path)?;
            fs::create_dir_all(&self.media_dir).await?;
            fs::copy(local_path, self.media_dir.join(&key)).await?;

            let url = self.url_for(&key);
            tracing::debug!(url = %url, "Media uploaded");
            Ok(url)
        })
    }
}
