//! # SessionVault DB
//!
//! Database pool and the user directory for the SessionVault API.
//!
//! - [`directory`]: The [`UserDirectory`] trait every backend implements
//! - [`postgres`]: PostgreSQL-backed directory using SQLx
//! - [`memory`]: In-process directory for tests and database-less runs
//!
//! # Example
//!
//! ```ignore
//! use sessionvault_db::{init_db_pool, PgUserDirectory};
//!
//! let pool = init_db_pool(&database_url).await?;
//! let users = PgUserDirectory::new(pool);
//! ```

pub mod directory;
pub mod memory;
pub mod postgres;

pub use directory::{DirectoryError, DirectoryFuture, UserDirectory};
pub use memory::InMemoryUserDirectory;
pub use postgres::PgUserDirectory;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a PostgreSQL pool to `database_url`.
///
/// Called once at startup; the pool is cheaply cloneable.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}
