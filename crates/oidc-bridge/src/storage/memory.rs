//! In-memory storage backends.
//!
//! Concurrent maps backing [`UserStorage`] and [`ClientStorage`] for
//! embedding and tests. Each call is atomic on its own; nothing spans a
//! read and a later write.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::AuthResult;
use crate::error::AuthError;
use crate::types::Client;

use super::client::ClientStorage;
use super::user::{UserRecord, UserStorage};

/// In-memory user store keyed by user identifier.
#[derive(Debug, Default)]
pub struct MemoryUserStorage {
    users: DashMap<String, UserRecord>,
}

impl MemoryUserStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn find_by_id(&self, user_id: &str) -> AuthResult<Option<UserRecord>> {
        Ok(self.users.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, user: &UserRecord) -> AuthResult<()> {
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(AuthError::storage(format!(
                "User already exists: {}",
                user.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, user: &UserRecord) -> AuthResult<()> {
        match self.users.get_mut(&user.id) {
            Some(mut entry) => {
                *entry = user.clone();
                Ok(())
            }
            None => Err(AuthError::storage(format!("User not found: {}", user.id))),
        }
    }

    async fn delete(&self, user_id: &str) -> AuthResult<()> {
        self.users
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| AuthError::storage(format!("User not found: {}", user_id)))
    }
}

/// In-memory relying-party registry.
#[derive(Debug, Default)]
pub struct MemoryClientStorage {
    clients: DashMap<String, Client>,
}

impl MemoryClientStorage {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for MemoryClientStorage {
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self.clients.get(client_id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, client: &Client) -> AuthResult<()> {
        client
            .validate()
            .map_err(|e| AuthError::invalid_client(e.to_string()))?;

        match self.clients.entry(client.client_id.clone()) {
            Entry::Occupied(_) => Err(AuthError::storage(format!(
                "Client already exists: {}",
                client.client_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(client.clone());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceAttributes;

    #[tokio::test]
    async fn test_user_create_and_find() {
        let storage = MemoryUserStorage::new();
        let user = UserRecord::new("u1", SourceAttributes::new().with("uid", ["u1"]));

        storage.create(&user).await.unwrap();

        let found = storage.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(storage.find_by_id("u2").await.unwrap().is_none());
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_user_create_duplicate_fails() {
        let storage = MemoryUserStorage::new();
        let user = UserRecord::new("u1", SourceAttributes::new());
        storage.create(&user).await.unwrap();

        let result = storage.create(&user).await;
        assert!(matches!(result, Err(AuthError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_user_update() {
        let storage = MemoryUserStorage::new();
        let mut user = UserRecord::new("u1", SourceAttributes::new().with("cn", ["Old"]));
        storage.create(&user).await.unwrap();

        user.replace_attributes(SourceAttributes::new().with("cn", ["New"]));
        storage.update(&user).await.unwrap();

        let found = storage.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(found.attributes.first("cn"), Some("New"));
    }

    #[tokio::test]
    async fn test_user_update_missing_fails() {
        let storage = MemoryUserStorage::new();
        let user = UserRecord::new("ghost", SourceAttributes::new());
        assert!(storage.update(&user).await.is_err());
    }

    #[tokio::test]
    async fn test_user_delete() {
        let storage = MemoryUserStorage::new();
        storage
            .create(&UserRecord::new("u1", SourceAttributes::new()))
            .await
            .unwrap();

        storage.delete("u1").await.unwrap();
        assert!(storage.is_empty());
        assert!(storage.delete("u1").await.is_err());
    }

    #[tokio::test]
    async fn test_client_create_and_find() {
        let storage = MemoryClientStorage::new();
        let client = Client::new("rp", "Relying Party").with_auth_source("default-sp");
        storage.create(&client).await.unwrap();

        let found = storage.find_by_client_id("rp").await.unwrap().unwrap();
        assert_eq!(found.auth_source(), Some("default-sp"));
        assert!(storage.find_by_client_id("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_client_create_validates() {
        let storage = MemoryClientStorage::new();
        let result = storage.create(&Client::new("", "Nameless")).await;
        assert!(matches!(result, Err(AuthError::InvalidClient { .. })));

        let client = Client::new("rp", "RP");
        storage.create(&client).await.unwrap();
        assert!(matches!(
            storage.create(&client).await,
            Err(AuthError::Storage { .. })
        ));
    }
}
