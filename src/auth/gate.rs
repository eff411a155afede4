/// Authorization gate
///
/// Protected handlers resolve the caller exactly once, through one of the
/// extractors below, and receive the result as a plain value. Resource checks
/// (ownership, admin policy) are explicit calls in the handler.

use actix_web::http::header::HeaderMap;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::auth::credentials::{extract_api_key, extract_bearer};
use crate::auth::jwt::validate_access_token;
use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::error::{AppError, AuthError};
use crate::state::AppState;

/// Resolve the account behind a bearer access token
pub fn authenticate_access(headers: &HeaderMap, auth: &AuthSettings) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers)?;
    validate_access_token(&token, &auth.secret)
}

/// Check the `ApiKey` credential against the configured webhook key
pub fn authenticate_api_key(headers: &HeaderMap, auth: &AuthSettings) -> Result<(), AuthError> {
    let key = extract_api_key(headers)?;
    if constant_time_eq(key.as_bytes(), auth.polka_key.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::ApiKeyMismatch)
    }
}

/// Caller must own the resource, otherwise 403
pub fn require_owner(caller: Uuid, owner: Uuid) -> Result<(), AppError> {
    if caller == owner {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "account {} does not own this resource",
            caller
        )))
    }
}

/// Admin-only operations are allowed on the dev platform only
pub fn require_admin(application: &ApplicationSettings) -> Result<(), AppError> {
    if application.is_dev() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "admin operation refused on platform {}",
            application.platform
        )))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state is not configured".to_string()))
}

/// Caller identity taken from a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: Uuid,
}

impl FromRequest for AuthenticatedAccount {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = app_state(req).and_then(|state| {
            let id = authenticate_access(req.headers(), &state.auth)?;
            tracing::debug!(user_id = %id, "Access token validated");
            Ok(AuthenticatedAccount { id })
        });
        ready(result)
    }
}

/// Raw bearer credential, for endpoints that take an opaque refresh token
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequest for BearerToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            extract_bearer(req.headers())
                .map(BearerToken)
                .map_err(AppError::from),
        )
    }
}

/// Proof that the request carried the configured webhook key
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey;

impl FromRequest for ServiceKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = app_state(req).and_then(|state| {
            authenticate_api_key(req.headers(), &state.auth)?;
            Ok(ServiceKey)
        });
        ready(result)
    }
}
