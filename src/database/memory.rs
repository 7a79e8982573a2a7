use super::{StoreError, UserStore};
use crate::models::User;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory store with the same uniqueness guarantees as the `users(email)` index.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, user: &User) -> Result<ObjectId, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::Duplicate(user.email.clone()));
        }

        let id = ObjectId::new();
        let mut stored = user.clone();
        stored.id = Some(id);
        users.insert(stored.email.clone(), stored);

        Ok(id)
    }

    async fn update_first_name(
        &self,
        email: &str,
        first_name: &str,
        updated_at: BsonDateTime,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(email).map(|user| {
            user.first_name = first_name.to_string();
            user.updated_at = Some(updated_at);
            user.clone()
        }))
    }

    async fn ping(&self) -> bool {
        true
    }
}

/// Store whose every call fails, for exercising the internal-error path.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database("connection refused at 10.0.0.7:27017".to_string()))
    }

    async fn insert(&self, _user: &User) -> Result<ObjectId, StoreError> {
        Err(StoreError::Database("connection refused at 10.0.0.7:27017".to_string()))
    }

    async fn update_first_name(
        &self,
        _email: &str,
        _first_name: &str,
        _updated_at: BsonDateTime,
    ) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database("connection refused at 10.0.0.7:27017".to_string()))
    }

    async fn ping(&self) -> bool {
        false
    }
}

/// Store where another writer always claims the email between lookup and insert.
pub struct RacingUserStore;

#[async_trait]
impl UserStore for RacingUserStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, user: &User) -> Result<ObjectId, StoreError> {
        Err(StoreError::Duplicate(format!("E11000 duplicate key error: email {}", user.email)))
    }

    async fn update_first_name(
        &self,
        _email: &str,
        _first_name: &str,
        _updated_at: BsonDateTime,
    ) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        let user = User::new("a@x.com", "A", "B", "hash".to_string());

        store.insert(&user).await.unwrap();
        let err = store.insert(&user).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_returns_none_for_unknown_email() {
        let store = InMemoryUserStore::new();
        let updated = store
            .update_first_name("missing@x.com", "Z", BsonDateTime::now())
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
