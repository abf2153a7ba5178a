//! # SessionVault Auth
//!
//! JWT claim types and token utilities.
//!
//! - [`claims`]: Claim structures for both token classes
//! - [`jwt`]: Token creation and verification
//!
//! # Token Types
//!
//! - **Access Token** ([`AccessTokenClaims`]): short-lived, never persisted, checked on every
//!   protected request
//! - **Refresh Token** ([`RefreshTokenClaims`]): long-lived, stored on the user record, exchanged
//!   for a new pair
//!
//! Each class is signed with its own secret from [`JwtConfig`](sessionvault_config::JwtConfig).
//!
//! # Example
//!
//! ```ignore
//! use sessionvault_auth::{create_access_token, verify_access_token};
//! use sessionvault_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "alice", "alice@example.com", "Alice", &config)?;
//! let claims = verify_access_token(&token, &config)?;
//! assert_eq!(claims.sub, user_id.to_string());
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{AccessTokenClaims, RefreshTokenClaims};
pub use jwt::{
    TokenError, create_access_token, create_access_token_at, create_refresh_token,
    create_refresh_token_at, verify_access_token, verify_refresh_token,
};
