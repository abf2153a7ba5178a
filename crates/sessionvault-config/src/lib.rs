//! # SessionVault Config
//!
//! Configuration types for the SessionVault API, loaded from environment
//! variables with development defaults:
//!
//! - [`jwt`]: Signing secrets and lifetimes for both token classes
//! - [`cookie`]: Attributes of the token cookies
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`upload`]: Staging and media directories for registration uploads
//! - [`server`]: Listener ports and database URL
//!
//! # Example
//!
//! ```ignore
//! use sessionvault_config::{JwtConfig, UploadConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let upload_config = UploadConfig::from_env();
//! ```

pub mod cookie;
pub mod cors;
pub mod jwt;
pub mod server;
pub mod upload;

// Re-export commonly used types at crate root
pub use cookie::CookieConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use upload::UploadConfig;

/// Parse an environment variable, falling back to `default` when it is unset
/// or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
