/// Access token issue and validation
///
/// Tokens are HS256 JWTs. Nothing about issued tokens is stored; validity is
/// decided from the signature, the issuer and the clock alone.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ACCESS_TOKEN_ISSUER};
use crate::error::{AppError, AuthError};

/// Issue an access token for `account_id`, valid for one hour from now
///
/// # Errors
/// Returns `AppError::Internal` if signing fails
pub fn issue_access_token(account_id: Uuid, secret: &str) -> Result<String, AppError> {
    issue_access_token_at(account_id, secret, Utc::now())
}

/// Issue an access token as if it had been created at `issued_at`
pub fn issue_access_token_at(
    account_id: Uuid,
    secret: &str,
    issued_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let claims = Claims::new(account_id, issued_at);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Validate an access token and return the account it was issued to
///
/// # Errors
/// - `SignatureInvalid` if the MAC does not verify under `secret`
/// - `Expired` once `exp` has passed
/// - `IssuerMismatch` if `iss` is not the access token issuer
/// - `Malformed` for anything that does not parse
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        let kind = match e.kind() {
            ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidIssuer => AuthError::IssuerMismatch,
            _ => AuthError::Malformed,
        };
        tracing::debug!(error = %e, kind = ?kind, "Access token rejected");
        kind
    })?;

    data.claims.account_id()
}
