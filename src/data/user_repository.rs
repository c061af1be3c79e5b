use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(user.id.clone(), user.clone());
        debug!(
            user_id = %user.id,
            email = %user.email,
            role = %user.role,
            "User saved to memory storage"
        );
        Ok(())
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, email = %u.email, "User found in storage"),
            None => trace!(email = email, "User not found in storage"),
        }
        Ok(user)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.save_user(user("user-2", "alice@example.com"))
            .await
            .unwrap();

        let found = repo.find_user_by_email("alice@example.com").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, "user-2");
    }

    #[tokio::test]
    async fn test_find_user_by_email_returns_none_for_unknown_email() {
        let repo = InMemoryUserRepository::new();
        let found = repo
            .find_user_by_email("nonexistent@example.com")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_user_by_email_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.save_user(user("user-3", "Bob@Example.com"))
            .await
            .unwrap();

        assert!(
            repo.find_user_by_email("Bob@Example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.find_user_by_email("bob@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_concurrent_reads() {
        let repo = InMemoryUserRepository::new();
        repo.save_user(user("user-4", "concurrent@example.com"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo_clone = repo.clone();
                tokio::spawn(async move {
                    repo_clone.find_user_by_email("concurrent@example.com").await
                })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert!(result.is_some());
        }
    }
}
