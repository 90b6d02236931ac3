//! Authentication routes for login, refresh, and logout.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::auth::AuthUser};
use caja_core::auth::{hash_password, verify_password};
use caja_db::{SessionRepository, UserRepository};
use caja_shared::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, TokenPair,
    UserInfo,
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Creates auth routes that require an authenticated user.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/sessions", get(list_sessions))
        .route("/auth/change-password", post(change_password))
}

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn internal_error(context: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": format!("An error occurred during {context}")
        })),
    )
        .into_response()
}

/// POST /auth/login - Authenticate a user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("login");
        }
    };

    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("login");
        }
    }

    let role: &str = match user.role {
        caja_db::entities::sea_orm_active_enums::UserRole::Admin => "admin",
        caja_db::entities::sea_orm_active_enums::UserRole::Treasurer => "treasurer",
        caja_db::entities::sea_orm_active_enums::UserRole::Viewer => "viewer",
    };

    let access_token = match state.jwt_service.generate_access_token(user.id, role) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error("login");
        }
    };

    let refresh_token = match state.jwt_service.generate_refresh_token(user.id, role) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error("login");
        }
    };

    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = Utc::now() + Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo
        .create(user.id, &refresh_token, expires_at, None)
        .await
    {
        error!(error = %e, "Failed to persist session");
        return internal_error("login");
    }

    info!(user_id = %user.id, "User logged in");

    Json(LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: role.to_string(),
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
    .into_response()
}

/// POST /auth/refresh - Rotate a refresh token into a new token pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // The refresh token must both decode and match an unrevoked session.
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(claims) => claims,
        Err(_) => return invalid_refresh(),
    };

    let session_repo = SessionRepository::new((*state.db).clone());
    let session = match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(session)) => session,
        Ok(None) => return invalid_refresh(),
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error("token refresh");
        }
    };

    if session.expires_at < Utc::now() {
        return invalid_refresh();
    }

    let access_token = match state
        .jwt_service
        .generate_access_token(claims.user_id(), &claims.role)
    {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error("token refresh");
        }
    };

    let new_refresh_token = match state
        .jwt_service
        .generate_refresh_token(claims.user_id(), &claims.role)
    {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error("token refresh");
        }
    };

    // Rotate: revoke the old session, persist the new one.
    if let Err(e) = session_repo.revoke(session.id).await {
        error!(error = %e, "Failed to revoke session");
        return internal_error("token refresh");
    }

    let expires_at = Utc::now() + Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo
        .create(claims.user_id(), &new_refresh_token, expires_at, None)
        .await
    {
        error!(error = %e, "Failed to persist session");
        return internal_error("token refresh");
    }

    Json(TokenPair::new(
        access_token,
        new_refresh_token,
        state.jwt_service.access_token_expires_in(),
    ))
    .into_response()
}

fn invalid_refresh() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_refresh_token",
            "message": "Refresh token is invalid, expired, or revoked"
        })),
    )
        .into_response()
}

/// POST /auth/logout - Revoke a refresh token's session.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(session)) => {
            if let Err(e) = session_repo.revoke(session.id).await {
                error!(error = %e, "Failed to revoke session");
                return internal_error("logout");
            }
        }
        // Already revoked or unknown: logout is idempotent.
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Database error during logout");
            return internal_error("logout");
        }
    }

    StatusCode::NO_CONTENT.into_response()
}

/// GET /auth/sessions - List the caller's active sessions, newest first.
///
/// Token hashes are never returned.
async fn list_sessions(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.get_user_sessions(user.user_id()).await {
        Ok(sessions) => {
            let sessions: Vec<serde_json::Value> = sessions
                .into_iter()
                .map(|s| {
                    json!({
                        "id": s.id,
                        "user_agent": s.user_agent,
                        "created_at": s.created_at,
                        "expires_at": s.expires_at,
                    })
                })
                .collect();

            Json(json!({ "sessions": sessions })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing sessions");
            internal_error("session listing")
        }
    }
}

/// POST /auth/change-password - Replace the caller's password.
///
/// Every session is revoked on success, so other devices must log in again.
async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let record = match user_repo.find_by_id(user.user_id()).await {
        Ok(Some(record)) => record,
        Ok(None) => return invalid_credentials(),
        Err(e) => {
            error!(error = %e, "Database error during password change");
            return internal_error("password change");
        }
    };

    match verify_password(&payload.current_password, &record.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %record.id, "Password change with wrong current password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("password change");
        }
    }

    let new_hash = match hash_password(&payload.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Password hashing error");
            return internal_error("password change");
        }
    };

    if let Err(e) = user_repo.update_password(record.id, new_hash).await {
        error!(error = %e, "Failed to update password");
        return internal_error("password change");
    }

    let session_repo = SessionRepository::new((*state.db).clone());
    match session_repo.revoke_all_for_user(record.id).await {
        Ok(revoked) => info!(user_id = %record.id, revoked, "Password changed"),
        Err(e) => error!(error = %e, "Failed to revoke sessions after password change"),
    }

    StatusCode::NO_CONTENT.into_response()
}

/// GET /auth/me - Return the authenticated user's profile.
async fn me(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(user.user_id()).await {
        Ok(Some(record)) => Json(UserInfo {
            id: record.id,
            email: record.email,
            full_name: record.full_name,
            role: user.role().to_string(),
        })
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User no longer exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error loading profile");
            internal_error("profile lookup")
        }
    }
}
