/// Refresh Token Management
///
/// Refresh tokens are opaque: 32 bytes from the OS random source, hex
/// encoded. The server keeps one row per token with an absolute expiry and
/// an optional revocation timestamp. Tokens are not rotated on use; a token
/// stays valid until it expires or is revoked.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AuthError, InfraError};
use crate::store::{RefreshTokenRecord, RefreshTokenStore, StoreError};

const REFRESH_TOKEN_BYTES: usize = 32;

/// Refresh tokens expire 60 days after creation
pub fn refresh_token_lifetime() -> Duration {
    Duration::days(60)
}

/// Generate a new refresh token
///
/// # Errors
/// Returns `InfraError::EntropyFailure` if the OS random source is unavailable
pub fn generate_refresh_token() -> Result<String, InfraError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| InfraError::EntropyFailure(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Lifecycle operations over the refresh token table
#[derive(Clone)]
pub struct RefreshTokens {
    store: Arc<dyn RefreshTokenStore>,
}

impl RefreshTokens {
    pub fn new(store: Arc<dyn RefreshTokenStore>) -> Self {
        Self { store }
    }

    /// Persist `token` for `account_id`, expiring 60 days from now
    ///
    /// # Errors
    /// - `InfraError::DuplicateToken` if the value already exists
    /// - `InfraError::Persistence` on storage failure
    pub async fn create(&self, token: &str, account_id: Uuid) -> Result<RefreshTokenRecord, AppError> {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            token: token.to_string(),
            user_id: account_id,
            created_at: now,
            expires_at: now + refresh_token_lifetime(),
            revoked_at: None,
        };

        self.store.insert(&record).await.map_err(|e| match e {
            StoreError::Duplicate(_) => InfraError::DuplicateToken,
            StoreError::Backend(msg) => InfraError::Persistence(msg),
        })?;

        tracing::debug!(user_id = %account_id, "Refresh token stored");
        Ok(record)
    }

    /// Fetch the row for `token`
    ///
    /// # Errors
    /// `AuthError::NotFound` if the token was never issued
    pub async fn lookup(&self, token: &str) -> Result<RefreshTokenRecord, AppError> {
        self.store
            .find(token)
            .await?
            .ok_or_else(|| AuthError::NotFound.into())
    }

    /// True iff the row exists, is not revoked and has not expired
    pub async fn is_usable(&self, token: &str) -> Result<bool, AppError> {
        match self.store.find(token).await? {
            Some(record) => Ok(record.is_usable_at(Utc::now())),
            None => Ok(false),
        }
    }

    /// Resolve a presented refresh token to its owning account
    ///
    /// # Errors
    /// `NotFound`, `Revoked` or `Expired` as `AuthError`
    pub async fn resolve_owner(&self, token: &str) -> Result<Uuid, AppError> {
        self.resolve_owner_at(token, Utc::now()).await
    }

    pub async fn resolve_owner_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AppError> {
        let record = self.lookup(token).await?;

        if record.revoked_at.is_some() {
            tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
            return Err(AuthError::Revoked.into());
        }
        if !record.is_usable_at(now) {
            tracing::info!(user_id = %record.user_id, "Refresh token expired");
            return Err(AuthError::Expired.into());
        }

        Ok(record.user_id)
    }

    /// Revoke `token`. Idempotent; unknown tokens are silently ignored.
    ///
    /// # Errors
    /// `InfraError::Persistence` on storage failure
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        self.store.mark_revoked(token, Utc::now()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (RefreshTokens, MemoryStore) {
        let store = MemoryStore::new();
        (RefreshTokens::new(Arc::new(store.clone())), store)
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token().unwrap();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_tokens_differ() {
        let first = generate_refresh_token().unwrap();
        let second = generate_refresh_token().unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_usable_after_create() {
        let (tokens, _) = service();
        let token = generate_refresh_token().unwrap();
        let account_id = Uuid::new_v4();

        let record = tokens.create(&token, account_id).await.unwrap();

        assert!(tokens.is_usable(&token).await.unwrap());
        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert_eq!(tokens.resolve_owner(&token).await.unwrap(), account_id);
    }

    #[tokio::test]
    async fn test_revoke_is_immediate_and_idempotent() {
        let (tokens, _) = service();
        let token = generate_refresh_token().unwrap();
        tokens.create(&token, Uuid::new_v4()).await.unwrap();

        tokens.revoke(&token).await.unwrap();
        assert!(!tokens.is_usable(&token).await.unwrap());
        let first_revocation = tokens.lookup(&token).await.unwrap().revoked_at;
        assert!(first_revocation.is_some());

        tokens.revoke(&token).await.unwrap();
        assert!(!tokens.is_usable(&token).await.unwrap());
        assert_eq!(tokens.lookup(&token).await.unwrap().revoked_at, first_revocation);

        assert!(matches!(
            tokens.resolve_owner(&token).await,
            Err(AppError::Auth(AuthError::Revoked))
        ));
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_is_noop() {
        let (tokens, _) = service();
        assert!(tokens.revoke("never-issued").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (tokens, _) = service();

        assert!(!tokens.is_usable("never-issued").await.unwrap());
        assert!(matches!(
            tokens.lookup("never-issued").await,
            Err(AppError::Auth(AuthError::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_unusable_after_expiry() {
        let (tokens, store) = service();
        let created_at = Utc::now() - Duration::days(61);
        let record = RefreshTokenRecord {
            token: "stale".to_string(),
            user_id: Uuid::new_v4(),
            created_at,
            expires_at: created_at + refresh_token_lifetime(),
            revoked_at: None,
        };
        store.insert(&record).await.unwrap();

        assert!(!tokens.is_usable("stale").await.unwrap());
        assert!(matches!(
            tokens.resolve_owner("stale").await,
            Err(AppError::Auth(AuthError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let (tokens, _) = service();
        let record = tokens.create("edge", Uuid::new_v4()).await.unwrap();

        let just_before = record.expires_at - Duration::seconds(1);
        assert!(tokens.resolve_owner_at("edge", just_before).await.is_ok());
        assert!(tokens
            .resolve_owner_at("edge", record.expires_at)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_duplicate_token_is_reported() {
        let (tokens, _) = service();
        tokens.create("dup", Uuid::new_v4()).await.unwrap();

        assert!(matches!(
            tokens.create("dup", Uuid::new_v4()).await,
            Err(AppError::Infra(InfraError::DuplicateToken))
        ));
    }
}
