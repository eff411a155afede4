use actix_web::{web, HttpResponse};

use crate::auth::require_admin;
use crate::error::AppError;
use crate::state::AppState;

/// GET /admin/metrics
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    let page = format!(
        "<html>\n<body>\n<h1>Welcome, Chirpy Admin</h1>\n<p>Chirpy has been visited {} times!</p>\n</body>\n</html>",
        state.hits.count()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// POST /admin/reset
///
/// Clears the hit counter and every account. Dev platform only.
pub async fn reset(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    require_admin(&state.application)?;

    state.hits.reset();
    state.accounts.delete_all().await?;

    tracing::warn!("Hit counter and all accounts reset");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Counter reset"))
}
