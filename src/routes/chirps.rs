use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{require_owner, AuthenticatedAccount};
use crate::error::{AppError, ValidationError};
use crate::state::AppState;
use crate::store::Chirp;
use crate::validators::{clean_chirp_body, SortDirection};

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

fn parse_chirp_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("chirp {}", raw)))
}

/// POST /api/chirps
///
/// The author is always the authenticated caller.
pub async fn create_chirp(
    caller: AuthenticatedAccount,
    form: web::Json<CreateChirpRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = clean_chirp_body(&form.body)?;
    let chirp = state.chirps.create(caller.id, &body).await?;

    tracing::info!(user_id = %caller.id, chirp_id = %chirp.id, "Chirp created");
    Ok(HttpResponse::Created().json(ChirpResponse::from(chirp)))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let direction = SortDirection::parse(query.sort.as_deref())?;
    let author = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidFormat("author_id"))?,
        ),
    };

    let mut chirps = state.chirps.list(author).await?;
    if direction == SortDirection::Desc {
        chirps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    let body: Vec<ChirpResponse> = chirps.into_iter().map(ChirpResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;
    let chirp = state
        .chirps
        .get(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("chirp {}", chirp_id)))?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(chirp)))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: missing or invalid access token
/// - 404: no such chirp
/// - 403: the caller is not the author
pub async fn delete_chirp(
    caller: AuthenticatedAccount,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;
    let chirp = state
        .chirps
        .get(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("chirp {}", chirp_id)))?;

    require_owner(caller.id, chirp.user_id)?;

    state.chirps.delete(chirp_id).await?;

    tracing::info!(user_id = %caller.id, chirp_id = %chirp_id, "Chirp deleted");
    Ok(HttpResponse::NoContent().finish())
}
