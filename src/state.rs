use std::sync::Arc;

use sessionvault_config::{CookieConfig, CorsConfig, JwtConfig, UploadConfig};
use sessionvault_core::MediaStore;
use sessionvault_db::UserDirectory;

/// Shared application state, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub media: Arc<dyn MediaStore>,
    pub jwt_config: JwtConfig,
    pub cookie_config: CookieConfig,
    pub cors_config: CorsConfig,
    pub upload_config: UploadConfig,
}

impl AppState {
    /// Build state from environment configuration around the given backends.
    pub fn from_env(users: Arc<dyn UserDirectory>, media: Arc<dyn MediaStore>) -> Self {
        Self {
            users,
            media,
            jwt_config: JwtConfig::from_env(),
            cookie_config: CookieConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            upload_config: UploadConfig::from_env(),
        }
    }
}
