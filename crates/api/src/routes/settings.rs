//! Settings routes.
//!
//! Keys prefixed with `user.` live in the caller's own scope (for example
//! a saved dashboard layout); all other keys are global and admin-managed.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{
    AppState,
    middleware::auth::{AuthUser, forbidden},
};
use caja_db::SettingRepository;

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings))
        .route("/settings/{key}", get(get_setting).put(put_setting))
}

fn is_user_scoped(key: &str) -> bool {
    key.starts_with("user.")
}

fn internal_error(e: &sea_orm::DbErr) -> Response {
    error!(error = %e, "Database error in settings operation");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "Settings operation failed"
        })),
    )
        .into_response()
}

/// GET /settings - List global settings (admin) or the caller's own.
async fn list_settings(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    let repo = SettingRepository::new((*state.db).clone());

    // Admins see the global scope plus their own; everyone else only
    // their own user-scoped keys.
    let global = if user.is_admin() {
        match repo.list(None).await {
            Ok(settings) => settings,
            Err(e) => return internal_error(&e),
        }
    } else {
        Vec::new()
    };

    let own = match repo.list(Some(user.user_id())).await {
        Ok(settings) => settings,
        Err(e) => return internal_error(&e),
    };

    Json(json!({ "global": global, "user": own })).into_response()
}

/// GET /settings/{key} - Read one setting.
async fn get_setting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let repo = SettingRepository::new((*state.db).clone());
    let scope = is_user_scoped(&key).then(|| user.user_id());

    match repo.get(&key, scope).await {
        Ok(Some(setting)) => Json(setting).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Setting not found: {key}")
            })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}

#[derive(Debug, Deserialize)]
struct PutSettingRequest {
    value: serde_json::Value,
}

/// PUT /settings/{key} - Create or replace a setting.
///
/// Global keys require the admin role; `user.` keys write to the
/// caller's own scope.
async fn put_setting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<PutSettingRequest>,
) -> impl IntoResponse {
    let scope = if is_user_scoped(&key) {
        Some(user.user_id())
    } else {
        if !user.is_admin() {
            return forbidden("Only admins can change global settings");
        }
        None
    };

    let repo = SettingRepository::new((*state.db).clone());

    match repo.upsert(&key, payload.value, scope).await {
        Ok(setting) => Json(setting).into_response(),
        Err(e) => internal_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::is_user_scoped;

    #[test]
    fn test_scope_detection() {
        assert!(is_user_scoped("user.dashboard_layout"));
        assert!(!is_user_scoped("dues.monthly_amount"));
    }
}
