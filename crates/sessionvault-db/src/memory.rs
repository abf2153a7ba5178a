//! In-process user directory.
//!
//! All state sits behind one `RwLock`; compare-and-swap holds the write lock
//! for the whole read-compare-write, so concurrent swaps serialize.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use sessionvault_models::{NewUser, User, UserId};

use crate::directory::{DirectoryError, DirectoryFuture, UserDirectory};

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete a user outright. Returns the removed record, if any.
    pub async fn remove(&self, id: UserId) -> Option<User> {
        self.users.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_id(&self, id: UserId) -> DirectoryFuture<'_, Option<User>> {
        Box::pin(async move { Ok(self.users.read().await.get(&id).cloned()) })
    }

    fn find_by_username_or_email<'a>(
        &'a self,
        username: Option<&'a str>,
        email: Option<&'a str>,
    ) -> DirectoryFuture<'a, Option<User>> {
        Box::pin(async move {
            let users = self.users.read().await;
            let found = users
                .values()
                .filter(|u| {
                    username.is_some_and(|name| u.username == name)
                        || email.is_some_and(|mail| u.email == mail)
                })
                .min_by_key(|u| u.created_at)
                .cloned();
            Ok(found)
        })
    }

    fn create(&self, user: NewUser) -> DirectoryFuture<'_, User> {
        Box::pin(async move {
            let mut users = self.users.write().await;

            if let Some(existing) = users
                .values()
                .find(|u| u.username == user.username || u.email == user.email)
            {
                let constraint = if existing.username == user.username {
                    "users_username_key"
                } else {
                    "users_email_key"
                };
                return Err(DirectoryError::UniqueViolation(constraint.to_string()));
            }

            let now = Utc::now();
            let created = User {
                id: UserId::new(),
                username: user.username,
                email: user.email,
                full_name: user.full_name,
                avatar: user.avatar,
                cover_image: user.cover_image,
                password_hash: user.password_hash,
                refresh_token: None,
                created_at: now,
                updated_at: now,
            };
            users.insert(created.id, created.clone());

            Ok(created)
        })
    }

    fn set_refresh_token<'a>(
        &'a self,
        id: UserId,
        token: Option<&'a str>,
    ) -> DirectoryFuture<'a, ()> {
        Box::pin(async move {
            let mut users = self.users.write().await;
            let user = users.get_mut(&id).ok_or(DirectoryError::NotFound)?;
            user.refresh_token = token.map(str::to_owned);
            user.updated_at = Utc::now();
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
            let mut users = self.users.write().await;
            match users.get_mut(&id) {
                Some(user) if user.refresh_token.as_deref() == Some(expected) => {
                    user.refresh_token = Some(replacement.to_string());
                    user.updated_at = Utc::now();
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            full_name: "Test User".to_string(),
            avatar: "http://cdn.test/a.png".to_string(),
            cover_image: String::new(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create(new_user("alice", "alice@example.com")).await.unwrap();

        assert!(user.refresh_token.is_none());
        assert_eq!(directory.find_by_id(user.id).await.unwrap(), Some(user.clone()));

        let by_name = directory
            .find_by_username_or_email(Some("alice"), None)
            .await
            .unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(user.id));

        let by_email = directory
            .find_by_username_or_email(None, Some("alice@example.com"))
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        let neither = directory.find_by_username_or_email(None, None).await.unwrap();
        assert!(neither.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_rejected() {
        let directory = InMemoryUserDirectory::new();
        directory.create(new_user("alice", "alice@example.com")).await.unwrap();

        let same_name = directory.create(new_user("alice", "other@example.com")).await;
        assert!(matches!(same_name, Err(DirectoryError::UniqueViolation(_))));

        let same_email = directory.create(new_user("bob", "alice@example.com")).await;
        assert!(matches!(same_email, Err(DirectoryError::UniqueViolation(_))));

        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_swap_requires_expected_value() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create(new_user("alice", "alice@example.com")).await.unwrap();
        directory.set_refresh_token(user.id, Some("r1")).await.unwrap();

        assert!(!directory.swap_refresh_token(user.id, "stale", "r2").await.unwrap());
        assert!(directory.swap_refresh_token(user.id, "r1", "r2").await.unwrap());
        assert!(!directory.swap_refresh_token(user.id, "r1", "r3").await.unwrap());

        let stored = directory.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_swap_fails_when_cleared() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create(new_user("alice", "alice@example.com")).await.unwrap();
        directory.set_refresh_token(user.id, Some("r1")).await.unwrap();
        directory.set_refresh_token(user.id, None).await.unwrap();

        assert!(!directory.swap_refresh_token(user.id, "r1", "r2").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_refresh_token_unknown_user() {
        let directory = InMemoryUserDirectory::new();
        let result = directory.set_refresh_token(UserId::new(), Some("r1")).await;
        assert!(matches!(result, Err(DirectoryError::NotFound)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_swaps_have_one_winner() {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let user = directory.create(new_user("alice", "alice@example.com")).await.unwrap();
        directory.set_refresh_token(user.id, Some("r1")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let directory = Arc::clone(&directory);
            handles.push(tokio::spawn(async move {
                directory
                    .swap_refresh_token(user.id, "r1", &format!("next-{}", i))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create(new_user("alice", "alice@example.com")).await.unwrap();

        assert!(directory.remove(user.id).await.is_some());
        assert!(directory.find_by_id(user.id).await.unwrap().is_none());
        assert!(directory.is_empty().await);
    }
}
