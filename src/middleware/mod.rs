//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: The access-token gate
//!
//! # Authentication Flow
//!
//! 1. Client sends the access token in the `accessToken` cookie or an
//!    `Authorization: Bearer <token>` header; the cookie wins when both exist
//! 2. `require_auth` verifies the token and resolves the user
//! 3. The resolved [`auth::AuthUser`] is stored in request extensions
//! 4. Handlers take `AuthUser` as an extractor
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn current_user(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     ApiResponse::ok(user, "current user fetched successfully")
//! }
//! ```

pub mod auth;
