//! In-process [`Store`] used by tests and local runs without Postgres.

use super::{Credential, NewUser, Store, StoreError, User};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<i32, User>,
    credentials: BTreeMap<i32, Credential>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user_with_credential(
        &self,
        user: NewUser,
        hash: &str,
        salt: &str,
    ) -> Result<User, StoreError> {
        // Uniqueness check and both inserts happen under one write lock.
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "username {} already exists",
                user.username
            )));
        }

        tables.next_id += 1;
        let id = tables.next_id;

        let created = User {
            id,
            username: user.username,
            admin: user.admin,
        };
        tables.users.insert(id, created.clone());
        tables.credentials.insert(
            id,
            Credential {
                user_id: id,
                hash: hash.to_string(),
                salt: salt.to_string(),
            },
        );

        Ok(created)
    }

    async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .and_then(|u| tables.credentials.get(&u.id))
            .cloned())
    }

    async fn update_credential(
        &self,
        user_id: i32,
        hash: &str,
        salt: &str,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        let credential = tables
            .credentials
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::Backend(format!("no credential for user {user_id}")))?;
        credential.hash = hash.to_string();
        credential.salt = salt.to_string();

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_users_by_username_prefix(&self, prefix: &str) -> Result<Vec<User>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .filter(|u| u.username.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            admin: false,
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() -> Result<()> {
        let store = MemoryStore::new();
        let alice = store
            .create_user_with_credential(new_user("alice"), "h1", "s1")
            .await?;
        let bob = store
            .create_user_with_credential(new_user("bob"), "h2", "s2")
            .await?;

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(store.get_user_by_id(2).await?, Some(bob));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_and_keeps_original_credential() -> Result<()> {
        let store = MemoryStore::new();
        store
            .create_user_with_credential(new_user("alice"), "h1", "s1")
            .await?;

        let result = store
            .create_user_with_credential(new_user("alice"), "h2", "s2")
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        assert_eq!(store.list_users().await?.len(), 1);
        let credential = store.get_credential_by_username("alice").await?;
        assert_eq!(credential.map(|c| c.hash), Some("h1".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() -> Result<()> {
        let store = MemoryStore::new();
        store
            .create_user_with_credential(new_user("alice"), "h1", "s1")
            .await?;
        store
            .create_user_with_credential(new_user("Alice"), "h2", "s2")
            .await?;

        assert!(store.get_credential_by_username("ALICE").await?.is_none());
        assert_eq!(store.list_users().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn update_credential_replaces_hash_and_salt() -> Result<()> {
        let store = MemoryStore::new();
        let alice = store
            .create_user_with_credential(new_user("alice"), "h1", "s1")
            .await?;

        store.update_credential(alice.id, "h2", "s2").await?;

        let credential = store.get_credential_by_username("alice").await?;
        assert_eq!(
            credential,
            Some(Credential {
                user_id: alice.id,
                hash: "h2".to_string(),
                salt: "s2".to_string(),
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn update_credential_for_unknown_user_fails() {
        let store = MemoryStore::new();
        let result = store.update_credential(42, "h", "s").await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn prefix_search_matches_start_only() -> Result<()> {
        let store = MemoryStore::new();
        for name in ["alice", "alfred", "bob", "malice"] {
            store
                .create_user_with_credential(new_user(name), "h", "s")
                .await?;
        }

        let found: Vec<String> = store
            .find_users_by_username_prefix("al")
            .await?
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(found, vec!["alice".to_string(), "alfred".to_string()]);
        Ok(())
    }
}
