/// Authorization header parsing
///
/// Every failure, whether the header is absent, carries another scheme, or
/// has nothing after the scheme, is reported as the same `MissingCredential`.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_scheme(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_scheme(headers, API_KEY_SCHEME)
}

fn extract_scheme(headers: &HeaderMap, scheme: &str) -> Result<String, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingCredential)?;

    let rest = value
        .strip_prefix(scheme)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .ok_or(AuthError::MissingCredential)?;

    match rest.trim() {
        "" => Err(AuthError::MissingCredential),
        credential => Ok(credential.to_string()),
    }
}
