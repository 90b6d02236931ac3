//! Event routes: CRUD, finalization, and attendance.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    middleware::auth::{AuthUser, forbidden},
};
use caja_core::ledger::{FundActivity, FundId, LedgerAggregator, LedgerSummary};
use caja_db::entities::sea_orm_active_enums::EventStatus;
use caja_db::repositories::event::{CreateEventInput, EventError, UpdateEventInput};
use caja_db::{AuditRepository, EventRepository, LedgerRepository, repositories::audit::AuditEntry};
use caja_shared::types::MemberId;

/// Creates the event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/{id}/finalize", post(finalize_event))
        .route(
            "/events/{id}/attendance",
            get(list_attendance).post(record_attendance),
        )
        .route(
            "/events/{id}/attendance/{member_id}",
            axum::routing::delete(remove_attendance),
        )
}

fn event_error_response(e: &EventError) -> Response {
    let (status, code) = match e {
        EventError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        EventError::MemberNotFound(_) => (StatusCode::NOT_FOUND, "member_not_found"),
        EventError::AlreadyFinalized(_) => (StatusCode::CONFLICT, "already_finalized"),
        EventError::AlreadyRecorded { .. } => (StatusCode::CONFLICT, "already_recorded"),
        EventError::InvalidDates => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_dates"),
        EventError::Database(db_err) => {
            error!(error = %db_err, "Database error in event operation");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

#[derive(Debug, Deserialize, Default)]
struct ListQuery {
    status: Option<String>,
}

/// GET /events - List events, optionally filtered by status.
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        Some("active") => Some(EventStatus::Active),
        Some("finalized") => Some(EventStatus::Finalized),
        Some(other) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_status",
                    "message": format!("Unknown event status: {other}")
                })),
            )
                .into_response();
        }
        None => None,
    };

    let repo = EventRepository::new((*state.db).clone());

    match repo.list(status).await {
        Ok(events) => Json(events).into_response(),
        Err(e) => event_error_response(&EventError::Database(e)),
    }
}

#[derive(Debug, Deserialize)]
struct CreateEventRequest {
    name: String,
    description: Option<String>,
    starts_on: chrono::NaiveDate,
    ends_on: Option<chrono::NaiveDate>,
}

/// POST /events - Create an event and its fund (treasurer+).
async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot create events");
    }

    let repo = EventRepository::new((*state.db).clone());
    let input = CreateEventInput {
        name: payload.name,
        description: payload.description,
        starts_on: payload.starts_on,
        ends_on: payload.ends_on,
    };

    match repo.create(input).await {
        Ok(event) => {
            info!(event_id = %event.id, "Event created");
            (StatusCode::CREATED, Json(event)).into_response()
        }
        Err(e) => event_error_response(&e),
    }
}

/// GET /events/{id} - Fetch one event with its fund activity.
async fn get_event(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = EventRepository::new((*state.db).clone());

    let event = match repo.find_by_id(id).await {
        Ok(Some(event)) => event,
        Ok(None) => return event_error_response(&EventError::NotFound(id)),
        Err(e) => return event_error_response(&EventError::Database(e)),
    };

    let ledger_repo = LedgerRepository::new((*state.db).clone());
    let snapshot = match ledger_repo.load_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return event_error_response(&EventError::Database(e)),
    };

    let summary = LedgerAggregator::aggregate(
        &snapshot.transactions,
        &snapshot.transfers,
        &snapshot.known_event_ids,
        None,
    );

    Json(json!({
        "event": event,
        "activity": event_fund_activity(&summary, id),
    }))
    .into_response()
}

/// Activity scoped to one event fund; an event with no postings yet
/// reports zeroes rather than a missing field.
fn event_fund_activity(summary: &LedgerSummary, event_id: Uuid) -> FundActivity {
    summary
        .fund(FundId::Event(event_id))
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug, Deserialize, Default)]
struct UpdateEventRequest {
    name: Option<String>,
    description: Option<Option<String>>,
    starts_on: Option<chrono::NaiveDate>,
    ends_on: Option<Option<chrono::NaiveDate>>,
}

/// PATCH /events/{id} - Update an event's descriptive fields (treasurer+).
async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify events");
    }

    let repo = EventRepository::new((*state.db).clone());
    let input = UpdateEventInput {
        name: payload.name,
        description: payload.description,
        starts_on: payload.starts_on,
        ends_on: payload.ends_on,
    };

    match repo.update(id, input).await {
        Ok(event) => Json(event).into_response(),
        Err(e) => event_error_response(&e),
    }
}

/// DELETE /events/{id} - Delete an event and its postings (treasurer+).
async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot delete events");
    }

    let repo = EventRepository::new((*state.db).clone());

    match repo.delete(id, user.user_id()).await {
        Ok(()) => {
            info!(event_id = %id, "Event deleted with its postings");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => event_error_response(&e),
    }
}

/// POST /events/{id}/finalize - Close an event's fund to postings (treasurer+).
async fn finalize_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot finalize events");
    }

    let repo = EventRepository::new((*state.db).clone());

    match repo.finalize(id).await {
        Ok(event) => {
            info!(event_id = %id, "Event finalized");

            let audit = AuditRepository::new((*state.db).clone());
            if let Err(e) = audit
                .record(AuditEntry {
                    action: "event.finalize".to_string(),
                    entity_type: "event".to_string(),
                    entity_id: Some(id),
                    detail: None,
                    user_id: user.user_id(),
                })
                .await
            {
                error!(error = %e, "Failed to record audit entry");
            }

            Json(event).into_response()
        }
        Err(e) => event_error_response(&e),
    }
}

/// GET /events/{id}/attendance - List attendance for an event.
async fn list_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = EventRepository::new((*state.db).clone());

    match repo.list_attendance(id).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => event_error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
struct AttendanceRequest {
    member_id: MemberId,
}

/// POST /events/{id}/attendance - Record a member's attendance (treasurer+).
async fn record_attendance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot record attendance");
    }

    let repo = EventRepository::new((*state.db).clone());

    match repo.record_attendance(id, payload.member_id.into_inner()).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => event_error_response(&e),
    }
}

/// DELETE /events/{id}/attendance/{member_id} - Remove a member's attendance (treasurer+).
async fn remove_attendance(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify attendance");
    }

    let repo = EventRepository::new((*state.db).clone());

    match repo.remove_attendance(id, member_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => event_error_response(&EventError::Database(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn activity(income: rust_decimal::Decimal, transfers_in: rust_decimal::Decimal) -> FundActivity {
        let mut a = FundActivity {
            income,
            transfers_in,
            ..FundActivity::default()
        };
        a.recompute_balance();
        a
    }

    #[test]
    fn test_event_detail_scopes_activity_to_its_own_fund() {
        let retreat = Uuid::new_v4();
        let camp = Uuid::new_v4();

        let mut summary = LedgerSummary::default();
        summary
            .events
            .insert(retreat, activity(dec!(500.00), dec!(300.00)));
        summary.events.insert(camp, activity(dec!(99.00), dec!(0)));

        let found = event_fund_activity(&summary, retreat);
        assert_eq!(found.balance, dec!(800.00));
        assert_eq!(found.income, dec!(500.00));
    }

    #[test]
    fn test_event_with_no_postings_reports_zero_activity() {
        let summary = LedgerSummary::default();
        let found = event_fund_activity(&summary, Uuid::new_v4());
        assert_eq!(found, FundActivity::default());
    }
}
