//! Audit log routes (admin only).

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use tracing::error;

use crate::{
    AppState,
    middleware::auth::{AuthUser, app_error_response, forbidden},
};
use caja_db::AuditRepository;
use caja_shared::{
    AppError,
    types::{PageRequest, PageResponse},
};

/// Creates the audit log routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit", get(list_audit))
}

/// GET /audit - Paginated audit log, newest first.
async fn list_audit(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return forbidden("Only admins can read the audit log");
    }

    let per_page = page.per_page.min(200);
    let repo = AuditRepository::new((*state.db).clone());

    match repo.list(u64::from(page.page), u64::from(per_page)).await {
        Ok((entries, total)) => {
            Json(PageResponse::new(entries, page.page, per_page, total)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list audit log");
            app_error_response(&AppError::Internal("Failed to read audit log".to_string()))
        }
    }
}
