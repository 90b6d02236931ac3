//! Inter-fund transfer routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    middleware::auth::{AuthUser, forbidden},
};
use caja_db::repositories::transfer::{CreateTransferInput, TransferError};
use caja_shared::types::{EventId, normalize_amount};
use caja_db::{AuditRepository, TransferRepository, repositories::audit::AuditEntry};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route("/transfers/{id}", get(get_transfer).delete(delete_transfer))
}

fn transfer_error_response(e: &TransferError) -> Response {
    let (status, code) = match e {
        TransferError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        TransferError::EventNotFound(_) => (StatusCode::NOT_FOUND, "event_not_found"),
        TransferError::EventFinalized(_) => (StatusCode::CONFLICT, "event_finalized"),
        TransferError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed"),
        TransferError::Database(db_err) => {
            error!(error = %db_err, "Database error in transfer operation");
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
    event_id: Option<Uuid>,
}

/// GET /transfers - List transfers, optionally touching one event fund.
async fn list_transfers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = TransferRepository::new((*state.db).clone());

    match repo.list(query.event_id).await {
        Ok(transfers) => Json(transfers).into_response(),
        Err(e) => transfer_error_response(&TransferError::Database(e)),
    }
}

#[derive(Debug, Deserialize)]
struct CreateTransferRequest {
    amount: Decimal,
    transfer_date: NaiveDate,
    description: String,
    /// Source fund; omit for the General fund.
    from_event_id: Option<EventId>,
    /// Destination fund; omit for the General fund.
    to_event_id: Option<EventId>,
}

/// POST /transfers - Move balance between two funds (treasurer+).
async fn create_transfer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTransferRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot record transfers");
    }

    let repo = TransferRepository::new((*state.db).clone());
    let input = CreateTransferInput {
        amount: normalize_amount(payload.amount),
        transfer_date: payload.transfer_date,
        description: payload.description,
        from_event_id: payload.from_event_id.map(EventId::into_inner),
        to_event_id: payload.to_event_id.map(EventId::into_inner),
        created_by: user.user_id(),
    };

    match repo.create(input).await {
        Ok(transfer) => {
            info!(transfer_id = %transfer.id, "Transfer recorded");

            let audit = AuditRepository::new((*state.db).clone());
            if let Err(e) = audit
                .record(AuditEntry {
                    action: "transfer.create".to_string(),
                    entity_type: "transfer".to_string(),
                    entity_id: Some(transfer.id),
                    detail: Some(json!({ "amount": transfer.amount })),
                    user_id: user.user_id(),
                })
                .await
            {
                error!(error = %e, "Failed to record audit entry");
            }

            (StatusCode::CREATED, Json(transfer)).into_response()
        }
        Err(e) => transfer_error_response(&e),
    }
}

/// GET /transfers/{id} - Fetch one transfer.
async fn get_transfer(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = TransferRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(transfer)) => Json(transfer).into_response(),
        Ok(None) => transfer_error_response(&TransferError::NotFound(id)),
        Err(e) => transfer_error_response(&TransferError::Database(e)),
    }
}

/// DELETE /transfers/{id} - Delete a transfer (treasurer+).
async fn delete_transfer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify transfers");
    }

    let repo = TransferRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            let audit = AuditRepository::new((*state.db).clone());
            if let Err(e) = audit
                .record(AuditEntry {
                    action: "transfer.delete".to_string(),
                    entity_type: "transfer".to_string(),
                    entity_id: Some(id),
                    detail: None,
                    user_id: user.user_id(),
                })
                .await
            {
                error!(error = %e, "Failed to record audit entry");
            }

            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => transfer_error_response(&e),
    }
}
