//! Category routes.

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
use uuid::Uuid;

use crate::{
    AppState,
    middleware::auth::{AuthUser, forbidden},
};
use caja_db::CategoryRepository;
use caja_db::repositories::category::{CategoryError, CreateCategoryInput, UpdateCategoryInput};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

fn category_error_response(e: &CategoryError) -> Response {
    let (status, code) = match e {
        CategoryError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        CategoryError::NameTaken(_) => (StatusCode::CONFLICT, "name_taken"),
        CategoryError::StillReferenced(_) => (StatusCode::CONFLICT, "still_referenced"),
        CategoryError::Database(db_err) => {
            error!(error = %db_err, "Database error in category operation");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

/// GET /categories - List all categories.
async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => category_error_response(&CategoryError::Database(e)),
    }
}

#[derive(Debug, Deserialize)]
struct CreateCategoryRequest {
    name: String,
    kind: caja_core::ledger::TransactionKind,
    #[serde(default)]
    is_dues: bool,
}

/// POST /categories - Create a category (treasurer+).
async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify categories");
    }

    let repo = CategoryRepository::new((*state.db).clone());
    let input = CreateCategoryInput {
        name: payload.name,
        kind: payload.kind.into(),
        is_dues: payload.is_dues,
    };

    match repo.create(input).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => category_error_response(&e),
    }
}

/// GET /categories/{id} - Fetch one category.
async fn get_category(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(category)) => Json(category).into_response(),
        Ok(None) => category_error_response(&CategoryError::NotFound(id)),
        Err(e) => category_error_response(&CategoryError::Database(e)),
    }
}

#[derive(Debug, Deserialize, Default)]
struct UpdateCategoryRequest {
    name: Option<String>,
    is_dues: Option<bool>,
}

/// PATCH /categories/{id} - Rename or re-flag a category (treasurer+).
async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify categories");
    }

    let repo = CategoryRepository::new((*state.db).clone());
    let input = UpdateCategoryInput {
        name: payload.name,
        is_dues: payload.is_dues,
    };

    match repo.update(id, input).await {
        Ok(category) => Json(category).into_response(),
        Err(e) => category_error_response(&e),
    }
}

/// DELETE /categories/{id} - Delete an unused category (treasurer+).
async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify categories");
    }

    let repo = CategoryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => category_error_response(&e),
    }
}
