//! User administration routes (admin only).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    middleware::auth::{AuthUser, forbidden},
};
use caja_core::auth::hash_password;
use caja_db::entities::sea_orm_active_enums::UserRole;
use caja_db::repositories::user::{CreateUserInput, UserError};
use caja_db::UserRepository;

/// Creates the user administration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).patch(update_user))
}

fn user_error_response(e: &UserError) -> Response {
    let (status, code) = match e {
        UserError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        UserError::EmailTaken(_) => (StatusCode::CONFLICT, "email_taken"),
        UserError::Database(db_err) => {
            error!(error = %db_err, "Database error in user operation");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

fn parse_role(role: &str) -> Option<UserRole> {
    match role {
        "admin" => Some(UserRole::Admin),
        "treasurer" => Some(UserRole::Treasurer),
        "viewer" => Some(UserRole::Viewer),
        _ => None,
    }
}

fn invalid_role(role: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": "invalid_role",
            "message": format!("Unknown role: {role}")
        })),
    )
        .into_response()
}

/// Public view of a user record (no password hash).
fn user_json(user: &caja_db::entities::users::Model) -> serde_json::Value {
    json!({
        "id": user.id,
        "email": user.email,
        "full_name": user.full_name,
        "role": user.role,
        "is_active": user.is_active,
        "created_at": user.created_at,
    })
}

/// GET /users - List all users.
async fn list_users(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    if !user.is_admin() {
        return forbidden("Only admins can manage users");
    }

    let repo = UserRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(users) => Json(users.iter().map(user_json).collect::<Vec<_>>()).into_response(),
        Err(e) => user_error_response(&UserError::Database(e)),
    }
}

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    email: String,
    password: String,
    full_name: String,
    role: String,
}

/// POST /users - Create a user account.
async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return forbidden("Only admins can manage users");
    }

    let Some(role) = parse_role(&payload.role) else {
        return invalid_role(&payload.role);
    };

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to create user"
                })),
            )
                .into_response();
        }
    };

    let repo = UserRepository::new((*state.db).clone());
    let input = CreateUserInput {
        email: payload.email,
        password_hash,
        full_name: payload.full_name,
        role,
    };

    match repo.create(input).await {
        Ok(created) => {
            info!(user_id = %created.id, "User created");
            (StatusCode::CREATED, Json(user_json(&created))).into_response()
        }
        Err(e) => user_error_response(&e),
    }
}

/// GET /users/{id} - Fetch one user.
async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return forbidden("Only admins can manage users");
    }

    let repo = UserRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(record)) => Json(user_json(&record)).into_response(),
        Ok(None) => user_error_response(&UserError::NotFound(id)),
        Err(e) => user_error_response(&UserError::Database(e)),
    }
}

#[derive(Debug, Deserialize, Default)]
struct UpdateUserRequest {
    role: Option<String>,
    is_active: Option<bool>,
}

/// PATCH /users/{id} - Change a user's role or active flag.
async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return forbidden("Only admins can manage users");
    }

    let repo = UserRepository::new((*state.db).clone());

    if let Some(role) = &payload.role {
        let Some(role) = parse_role(role) else {
            return invalid_role(role);
        };

        if let Err(e) = repo.update_role(id, role).await {
            return user_error_response(&e);
        }
    }

    if let Some(is_active) = payload.is_active
        && let Err(e) = repo.set_active(id, is_active).await
    {
        return user_error_response(&e);
    }

    match repo.find_by_id(id).await {
        Ok(Some(record)) => Json(user_json(&record)).into_response(),
        Ok(None) => user_error_response(&UserError::NotFound(id)),
        Err(e) => user_error_response(&UserError::Database(e)),
    }
}
