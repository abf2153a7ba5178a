//! Uploaded files staged on local disk.
//!
//! A [`StagedFile`] owns its temp file: dropping the guard removes the file,
//! whichever way the request ends. Registration can therefore return early on
//! any validation or duplicate failure without leaving orphans behind.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    original_name: Option<String>,
}

impl StagedFile {
    /// Write `bytes` into `staging_dir` under a unique name.
    ///
    /// The guard exists before the write starts, so a failed write cleans up
    /// its partial file too.
    pub async fn stage(
        staging_dir: &Path,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> std::io::Result<Self> {
        fs::create_dir_all(staging_dir).await?;

        let file_name = match original_name.map(sanitize_file_name) {
            Some(name) if !name.is_empty() => format!("{}-{}", Uuid::new_v4(), name),
            _ => Uuid::new_v4().to_string(),
        };

        let staged = Self {
            path: staging_dir.join(file_name),
            original_name: original_name.map(str::to_owned),
        };
        fs::write(&staged.path, bytes).await?;

        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed staged upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staged upload"
            ),
        }
    }
}

/// Keep ASCII alphanumerics, dots, hyphens and underscores; replace the rest.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("sessionvault-staging-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\me.png"), "me.png");
        assert_eq!(sanitize_file_name("my avatar (1).png"), "my_avatar__1_.png");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = scratch_dir();
        let staged = StagedFile::stage(&dir, Some("avatar.png"), b"bytes").await.unwrap();
        let path = staged.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(staged.original_name(), Some("avatar.png"));
        assert!(path.to_string_lossy().ends_with("-avatar.png"));

        drop(staged);
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_drop_tolerates_already_removed_file() {
        let dir = scratch_dir();
        let staged = StagedFile::stage(&dir, None, b"bytes").await.unwrap();
        std::fs::remove_file(staged.path()).unwrap();
        drop(staged);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
