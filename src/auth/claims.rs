/// Access token claims
///
/// Only subject and issuer are carried, plus the standard time claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Issuer tag stamped on every access token. Any other value is rejected.
pub const ACCESS_TOKEN_ISSUER: &str = "chirpy-access";

/// Access tokens are valid for one hour after issue
pub fn access_token_lifetime() -> Duration {
    Duration::hours(1)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID as UUID string)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(account_id: Uuid, issued_at: DateTime<Utc>) -> Self {
        let expires_at = issued_at + access_token_lifetime();
        Self {
            sub: account_id.to_string(),
            iss: ACCESS_TOKEN_ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Parse the subject back into an account ID
    pub fn account_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::Malformed)
    }
}
