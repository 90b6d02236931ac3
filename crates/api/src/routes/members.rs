//! Member directory routes, including the per-member dues status.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    AppState,
    middleware::auth::{AuthUser, forbidden},
};
use caja_core::dues::DuesService;
use caja_db::repositories::member::{CreateMemberInput, MemberError, UpdateMemberInput};
use caja_db::{MemberRepository, SettingRepository, TransactionRepository};

/// Creates the member routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/{id}",
            get(get_member).patch(update_member).delete(delete_member),
        )
        .route("/members/{id}/dues", get(member_dues))
}

fn member_error_response(e: &MemberError) -> Response {
    let (status, code) = match e {
        MemberError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        MemberError::StillReferenced(_) => (StatusCode::CONFLICT, "still_referenced"),
        MemberError::Database(db_err) => {
            error!(error = %db_err, "Database error in member operation");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    active_only: bool,
}

/// GET /members - List members.
async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    match repo.list(query.active_only).await {
        Ok(members) => Json(members).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list members");
            member_error_response(&MemberError::Database(e))
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateMemberRequest {
    full_name: String,
    phone: Option<String>,
    email: Option<String>,
    birth_date: Option<chrono::NaiveDate>,
    joined_at: Option<chrono::NaiveDate>,
    notes: Option<String>,
}

/// POST /members - Create a member (treasurer+).
async fn create_member(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMemberRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify the member directory");
    }

    let repo = MemberRepository::new((*state.db).clone());
    let input = CreateMemberInput {
        full_name: payload.full_name,
        phone: payload.phone,
        email: payload.email,
        birth_date: payload.birth_date,
        joined_at: payload.joined_at,
        notes: payload.notes,
    };

    match repo.create(input).await {
        Ok(member) => (StatusCode::CREATED, Json(member)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create member");
            member_error_response(&MemberError::Database(e))
        }
    }
}

/// GET /members/{id} - Fetch one member.
async fn get_member(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(member)) => Json(member).into_response(),
        Ok(None) => member_error_response(&MemberError::NotFound(id)),
        Err(e) => member_error_response(&MemberError::Database(e)),
    }
}

#[derive(Debug, Deserialize, Default)]
struct UpdateMemberRequest {
    full_name: Option<String>,
    phone: Option<Option<String>>,
    email: Option<Option<String>>,
    birth_date: Option<Option<chrono::NaiveDate>>,
    joined_at: Option<Option<chrono::NaiveDate>>,
    notes: Option<Option<String>>,
    is_active: Option<bool>,
}

/// PATCH /members/{id} - Update a member (treasurer+).
async fn update_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify the member directory");
    }

    let repo = MemberRepository::new((*state.db).clone());
    let input = UpdateMemberInput {
        full_name: payload.full_name,
        phone: payload.phone,
        email: payload.email,
        birth_date: payload.birth_date,
        joined_at: payload.joined_at,
        notes: payload.notes,
        is_active: payload.is_active,
    };

    match repo.update(id, input).await {
        Ok(member) => Json(member).into_response(),
        Err(e) => member_error_response(&e),
    }
}

/// DELETE /members/{id} - Delete a member with no history (treasurer+).
async fn delete_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify the member directory");
    }

    let repo = MemberRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => member_error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
struct DuesQuery {
    year: Option<i32>,
}

/// GET /members/{id}/dues - A member's dues status for a year.
async fn member_dues(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DuesQuery>,
) -> impl IntoResponse {
    let member_repo = MemberRepository::new((*state.db).clone());

    match member_repo.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return member_error_response(&MemberError::NotFound(id)),
        Err(e) => return member_error_response(&MemberError::Database(e)),
    }

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let monthly_due = resolve_monthly_due(&state).await;

    let tx_repo = TransactionRepository::new((*state.db).clone());
    match tx_repo.dues_payments(id, year).await {
        Ok(payments) => {
            let status = DuesService::member_status(id, year, monthly_due, &payments);
            Json(status).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load dues payments");
            member_error_response(&MemberError::Database(e))
        }
    }
}

/// Resolves the monthly due amount: the global setting wins, then the
/// configured fallback.
async fn resolve_monthly_due(state: &AppState) -> Decimal {
    let setting_repo = SettingRepository::new((*state.db).clone());

    if let Ok(Some(setting)) = setting_repo.get("dues.monthly_amount", None).await
        && let Some(amount) = parse_due_setting(&setting.value)
    {
        return amount;
    }

    state.monthly_dues
}

/// The setting stores the amount as a JSON string to keep floats out of
/// the pipeline entirely.
fn parse_due_setting(value: &serde_json::Value) -> Option<Decimal> {
    value.as_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_due_setting() {
        assert_eq!(parse_due_setting(&json!("12.50")), Some(dec!(12.50)));
        // JSON numbers are rejected, only string amounts are accepted
        assert_eq!(parse_due_setting(&json!(12.5)), None);
        assert_eq!(parse_due_setting(&json!("not a number")), None);
    }
}
