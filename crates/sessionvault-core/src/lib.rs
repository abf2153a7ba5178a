//! # SessionVault Core
//!
//! Core types, errors, and utilities shared by every SessionVault crate.
//!
//! - [`errors`]: The transport-free [`AuthError`] taxonomy and its HTTP mapping, [`AppError`]
//! - [`response`]: The success envelope returned by every endpoint
//! - [`password`]: bcrypt password hashing and verification
//! - [`media_store`]: The media store abstraction and a local filesystem implementation
//! - [`staging`]: Scoped guard for uploaded files staged on local disk
//!
//! # Example
//!
//! ```ignore
//! use sessionvault_core::{AppError, AuthError};
//!
//! let err = AuthError::unauthorized("invalid user credentials");
//! let response: AppError = err.into(); // 401 with the uniform error body
//! ```

pub mod errors;
pub mod media_store;
pub mod password;
pub mod response;
pub mod staging;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use media_store::{LocalMediaStore, MediaStore, StorageError};
pub use password::{hash_password, verify_password};
pub use response::ApiResponse;
pub use staging::StagedFile;
