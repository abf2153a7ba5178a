//! PostgreSQL user directory.

use sqlx::PgPool;

use sessionvault_models::{NewUser, User, UserId};

use crate::directory::{DirectoryError, DirectoryFuture, UserDirectory};

const USER_COLUMNS: &str = "id, username, email, full_name, avatar, cover_image, \
     password_hash, refresh_token, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

fn map_insert_error(e: sqlx::Error) -> DirectoryError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        let constraint = db_err.constraint().unwrap_or("users").to_string();
        return DirectoryError::UniqueViolation(constraint);
    }
    DirectoryError::from(e)
}

impl UserDirectory for PgUserDirectory {
    fn find_by_id(&self, id: UserId) -> DirectoryFuture<'_, Option<User>> {
        Box::pin(async move {
            let user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

            Ok(user)
        })
    }

    fn find_by_username_or_email<'a>(
        &'a self,
        username: Option<&'a str>,
        email: Option<&'a str>,
    ) -> DirectoryFuture<'a, Option<User>> {
        Box::pin(async move {
            if username.is_none() && email.is_none() {
                return Ok(None);
            }

            let user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users \
                 WHERE ($1::TEXT IS NOT NULL AND username = $1) \
                    OR ($2::TEXT IS NOT NULL AND email = $2) \
                 ORDER BY created_at \
                 LIMIT 1"
            ))
            .bind(username)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

            Ok(user)
        })
    }

    fn create(&self, user: NewUser) -> DirectoryFuture<'_, User> {
        Box::pin(async move {
            let created = sqlx::query_as::<_, User>(&format!(
                "INSERT INTO users (username, email, full_name, avatar, cover_image, password_hash) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING {USER_COLUMNS}"
            ))
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.avatar)
            .bind(&user.cover_image)
            .bind(&user.password_hash)
            .fetch_one(&self.db)
            .await
            .map_err(map_insert_error)?;

            Ok(created)
        })
    }

    fn set_refresh_token<'a>(
        &'a self,
        id: UserId,
        token: Option<&'a str>,
    ) -> DirectoryFuture<'a, ()> {
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(token)
            .execute(&self.db)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DirectoryError::NotFound);
            }
            Ok(())
        })
    }

    fn swap_refresh_token<'a>(
        &'a self,
        id: UserId,
        expected: &'a str,
        replacement: &'a str,
    ) -> DirectoryFuture<'a, bool> {
        Box::pin(async move {
            // A single conditional UPDATE is atomic per row.
            let result = sqlx::query(
                "UPDATE users SET refresh_token = $3, updated_at = NOW() \
                 WHERE id = $1 AND refresh_token = $2",
            )
            .bind(id)
            .bind(expected)
            .bind(replacement)
            .execute(&self.db)
            .await?;

            let swapped = result.rows_affected() == 1;
            if !swapped {
                tracing::debug!(user_id = %id, "Refresh token swap lost");
            }
            Ok(swapped)
        })
    }
}
