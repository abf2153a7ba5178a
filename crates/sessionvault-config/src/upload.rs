use std::env;
use std::path::PathBuf;

/// Where registration uploads are staged and where the local media store
/// publishes them.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub staging_dir: PathBuf,
    pub media_dir: PathBuf,
    pub media_base_url: String,
    /// Per-file limit enforced by the media store.
    pub max_file_size: u64,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            staging_dir: env::var("UPLOAD_STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public/temp")),
            media_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public/media")),
            // Served by the app itself under `/media`.
            media_base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8001/media".to_string()),
            max_file_size: crate::env_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
        }
    }

    /// Request body limit for multipart registration: two files plus form fields.
    pub fn max_request_bytes(&self) -> usize {
        usize::try_from(self.max_file_size)
            .unwrap_or(usize::MAX)
            .saturating_mul(2)
            .saturating_add(64 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_file_size: u64) -> UploadConfig {
        UploadConfig {
            staging_dir: PathBuf::from("/tmp/staging"),
            media_dir: PathBuf::from("/tmp/media"),
            media_base_url: "http://localhost/media".to_string(),
            max_file_size,
        }
    }

    #[test]
    fn test_max_request_bytes_covers_two_files() {
        assert_eq!(config(1024).max_request_bytes(), 2 * 1024 + 64 * 1024);
    }

    #[test]
    fn test_max_request_bytes_saturates() {
        assert_eq!(config(u64::MAX).max_request_bytes(), usize::MAX);
        assert_eq!(config(u64::MAX / 2).max_request_bytes(), usize::MAX);
    }
}
