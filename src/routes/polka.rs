/// Payment provider webhook
///
/// Authenticated with the `ApiKey` scheme; only `user.upgraded` events act.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::ServiceKey;
use crate::error::{AppError, ValidationError};
use crate::state::AppState;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct PolkaEvent {
    pub event: String,
    pub data: PolkaEventData,
}

#[derive(Deserialize)]
pub struct PolkaEventData {
    pub user_id: String,
}

/// POST /api/polka/webhooks
pub async fn polka_webhook(
    _key: ServiceKey,
    payload: web::Json<PolkaEvent>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if payload.event != USER_UPGRADED {
        tracing::debug!(event = %payload.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&payload.data.user_id)
        .map_err(|_| ValidationError::InvalidFormat("user_id"))?;

    if !state.accounts.upgrade(user_id).await? {
        return Err(AppError::NotFound(format!("account {}", user_id)));
    }

    tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
    Ok(HttpResponse::NoContent().finish())
}
