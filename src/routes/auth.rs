/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{generate_refresh_token, issue_access_token, verify_password, BearerToken};
use crate::error::{AppError, AuthError};
use crate::state::AppState;
use crate::store::Account;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login keys the account as `user_id`, unlike the `id` of `UserResponse`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

impl LoginResponse {
    fn new(account: Account, token: String, refresh_token: String) -> Self {
        Self {
            user_id: account.id,
            created_at: account.created_at,
            updated_at: account.updated_at,
            email: account.email,
            is_chirpy_red: account.is_chirpy_red,
            token,
            refresh_token,
        }
    }
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// Returns a one-hour access token and a new 60-day refresh token.
///
/// # Security Notes
/// - Unknown email and wrong password produce the same 401
pub async fn login(
    form: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let account = match state.accounts.find_by_email(form.email.trim()).await? {
        Some(account) => account,
        None => {
            tracing::debug!("Login attempt for unknown email");
            return Err(AuthError::PasswordMismatch.into());
        }
    };

    verify_password(&form.password, &account.hashed_password)?;

    let token = issue_access_token(account.id, &state.auth.secret)?;
    let refresh_token = generate_refresh_token()?;
    state.refresh_tokens.create(&refresh_token, account.id).await?;

    tracing::info!(user_id = %account.id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse::new(account, token, refresh_token)))
}

/// POST /api/refresh
///
/// Exchanges a usable refresh token for a new access token. The refresh
/// token itself is left untouched.
///
/// # Errors
/// - 401: refresh token missing, unknown, revoked or expired
pub async fn refresh(
    bearer: BearerToken,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let account_id = state.refresh_tokens.resolve_owner(&bearer.0).await?;
    let token = issue_access_token(account_id, &state.auth.secret)?;

    tracing::info!(user_id = %account_id, "Access token refreshed");
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Always 204 once a bearer credential is present; whether the token existed
/// is not disclosed.
pub async fn revoke(
    bearer: BearerToken,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.refresh_tokens.revoke(&bearer.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
