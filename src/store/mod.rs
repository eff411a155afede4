/// Persistence collaborators
///
/// The service only talks to storage through these traits. `PgStore` backs
/// production; `MemoryStore` has identical semantics and backs the tests.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    /// A unique column already holds this value
    Duplicate(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate(what) => write!(f, "Duplicate {}", what),
            StoreError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted refresh token row. The token value is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Not revoked and not yet expired at `now`
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, email: &str, hashed_password: &str) -> Result<Account, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Returns `None` when no account has this id
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Sets the subscription flag. Returns `false` when no account has this id.
    async fn upgrade(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Deletes every account together with its chirps and refresh tokens
    async fn delete_all(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError>;

    /// Oldest first, optionally restricted to one author
    async fn list(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Chirp>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the token value already exists
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), StoreError>;

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Sets `revoked_at` only if it is unset. Unknown tokens are ignored.
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}
