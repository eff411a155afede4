/// Account routes
///
/// Registration and credential updates.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, AuthenticatedAccount};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::Account;
use crate::validators::is_valid_email;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<Account> for UserResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            created_at: account.created_at,
            updated_at: account.updated_at,
            email: account.email,
            is_chirpy_red: account.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email
/// - 409: email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let account = state.accounts.create(&email, &hashed_password).await?;

    tracing::info!(user_id = %account.id, "User registered");
    Ok(HttpResponse::Created().json(UserResponse::from(account)))
}

/// PUT /api/users
///
/// Replaces the caller's own email and password.
///
/// # Errors
/// - 401: missing or invalid access token
/// - 400: invalid email
/// - 404: the account behind the token no longer exists
/// - 409: email belongs to another account
pub async fn update_user(
    caller: AuthenticatedAccount,
    form: web::Json<CredentialsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let account = state
        .accounts
        .update_credentials(caller.id, &email, &hashed_password)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {}", caller.id)))?;

    tracing::info!(user_id = %account.id, "User credentials updated");
    Ok(HttpResponse::Ok().json(UserResponse::from(account)))
}
