//! The user directory abstraction.
//!
//! Session logic talks to user storage only through [`UserDirectory`].
//! Every write to a user's refresh token goes through
//! [`UserDirectory::set_refresh_token`] or the compare-and-swap
//! [`UserDirectory::swap_refresh_token`]; implementations must make the
//! latter atomic with respect to every other write to the same user.

use std::future::Future;
use std::pin::Pin;

use sessionvault_models::{NewUser, User, UserId};
use thiserror::Error;

/// Boxed future returned by [`UserDirectory`] methods.
pub type DirectoryFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, DirectoryError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Username or email collides with an existing user.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The targeted user does not exist.
    #[error("user not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub trait UserDirectory: Send + Sync {
    fn find_by_id(&self, id: UserId) -> DirectoryFuture<'_, Option<User>>;

    /// Look up a user whose username equals `username` or whose email
    /// equals `email`. Either side may be absent; both absent yields `None`.
    fn find_by_username_or_email<'a>(
        &'a self,
        username: Option<&'a str>,
        email: Option<&'a str>,
    ) -> DirectoryFuture<'a, Option<User>>;

    /// Persist a new user with no refresh token.
    fn create(&self, user: NewUser) -> DirectoryFuture<'_, User>;

    /// Unconditionally overwrite the stored refresh token.
    fn set_refresh_token<'a>(
        &'a self,
        id: UserId,
        token: Option<&'a str>,
    ) -> DirectoryFuture<'a, ()>;

    /// Replace the stored refresh token with `replacement` only if it still
    /// equals `expected`. Returns whether the swap happened.
    fn swap_refresh_token<'a>(
        &'a self,
        id: UserId,
        expected: &'a str,
        replacement: &'a str,
    ) -> DirectoryFuture<'a, bool>;
}
