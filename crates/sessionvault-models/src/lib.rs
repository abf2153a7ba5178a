//! # SessionVault Models
//!
//! Domain models and DTOs for the SessionVault API.
//!
//! - [`ids`]: Strongly-typed user identifier
//! - [`users`]: The stored user record and its public projection
//! - [`auth`]: Login, registration and token DTOs
//!
//! The stored [`User`] is never serialized; everything sent to clients goes
//! through [`PublicUser`], which has no password hash and no refresh token.

pub mod auth;
pub mod ids;
pub mod users;

// Re-export commonly used types at crate root
pub use auth::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RegisterForm, RegisterUpload, TokenPair,
};
pub use ids::UserId;
pub use users::{NewUser, PublicUser, User};
