use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Account, AccountStore, Chirp, ChirpStore, RefreshTokenRecord, RefreshTokenStore, StoreError,
};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

/// In-memory store with the same semantics as the Postgres schema,
/// including cascading deletes from accounts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create(&self, email: &str, hashed_password: &str) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.email == email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<Account>, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .accounts
            .values()
            .any(|a| a.email == email && a.id != id)
        {
            return Err(StoreError::Duplicate("email".to_string()));
        }

        Ok(tables.accounts.get_mut(&id).map(|account| {
            account.email = email.to_string();
            account.hashed_password = hashed_password.to_string();
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn upgrade(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.accounts.get_mut(&id) {
            Some(account) => {
                account.is_chirpy_red = true;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.accounts.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&user_id) {
            return Err(StoreError::Backend(format!(
                "chirp author {} does not exist",
                user_id
            )));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            body: body.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        let tables = self.tables.read().await;
        // Insertion order is creation order
        Ok(tables
            .chirps
            .iter()
            .filter(|c| author.map_or(true, |id| c.user_id == id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() != before)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.refresh_tokens.contains_key(&record.token) {
            return Err(StoreError::Duplicate("refresh token".to_string()));
        }
        tables
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(record) = tables.refresh_tokens.get_mut(token) {
            if record.revoked_at.is_none() {
                record.revoked_at = Some(at);
            }
        }
        Ok(())
    }
}
