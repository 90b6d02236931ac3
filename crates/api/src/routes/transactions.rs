//! Transaction routes.

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
use caja_shared::types::normalize_amount;
use caja_db::repositories::transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, UpdateTransactionInput,
};
use caja_db::{AuditRepository, TransactionRepository, repositories::audit::AuditEntry};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

pub(crate) fn transaction_error_response(e: &TransactionError) -> Response {
    let (status, code) = match e {
        TransactionError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        TransactionError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "category_not_found"),
        TransactionError::EventNotFound(_) => (StatusCode::NOT_FOUND, "event_not_found"),
        TransactionError::MemberNotFound(_) => (StatusCode::NOT_FOUND, "member_not_found"),
        TransactionError::EventFinalized(_) => (StatusCode::CONFLICT, "event_finalized"),
        TransactionError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed"),
        TransactionError::ImportRow { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "import_rejected")
        }
        TransactionError::Database(db_err) => {
            error!(error = %db_err, "Database error in transaction operation");
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
    kind: Option<caja_core::ledger::TransactionKind>,
    category_id: Option<Uuid>,
    event_id: Option<Uuid>,
    #[serde(default)]
    general_only: bool,
    member_id: Option<Uuid>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

/// GET /transactions - List transactions with optional filters.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        kind: query.kind.map(Into::into),
        category_id: query.category_id,
        event_id: query.event_id,
        general_only: query.general_only,
        member_id: query.member_id,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    match repo.list(filter).await {
        Ok(transactions) => Json(transactions).into_response(),
        Err(e) => transaction_error_response(&TransactionError::Database(e)),
    }
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Income or expense.
    pub kind: caja_core::ledger::TransactionKind,
    /// Positive amount, two decimal places.
    pub amount: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Category classification.
    pub category_id: Uuid,
    /// Owning event fund; omit to post to the General fund.
    pub event_id: Option<Uuid>,
    /// Attributed member, if any.
    pub member_id: Option<Uuid>,
}

impl CreateTransactionRequest {
    pub(crate) fn into_input(self, created_by: Uuid) -> CreateTransactionInput {
        CreateTransactionInput {
            kind: self.kind.into(),
            amount: normalize_amount(self.amount),
            transaction_date: self.transaction_date,
            description: self.description,
            category_id: self.category_id,
            event_id: self.event_id,
            member_id: self.member_id,
            created_by,
        }
    }
}

/// POST /transactions - Record a transaction (treasurer+).
async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot record transactions");
    }

    let repo = TransactionRepository::new((*state.db).clone());

    match repo.create(payload.into_input(user.user_id())).await {
        Ok(transaction) => {
            info!(transaction_id = %transaction.id, "Transaction recorded");

            let audit = AuditRepository::new((*state.db).clone());
            if let Err(e) = audit
                .record(AuditEntry {
                    action: "transaction.create".to_string(),
                    entity_type: "transaction".to_string(),
                    entity_id: Some(transaction.id),
                    detail: Some(json!({ "amount": transaction.amount })),
                    user_id: user.user_id(),
                })
                .await
            {
                error!(error = %e, "Failed to record audit entry");
            }

            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

/// GET /transactions/{id} - Fetch one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(transaction)) => Json(transaction).into_response(),
        Ok(None) => transaction_error_response(&TransactionError::NotFound(id)),
        Err(e) => transaction_error_response(&TransactionError::Database(e)),
    }
}

#[derive(Debug, Deserialize, Default)]
struct UpdateTransactionRequest {
    amount: Option<Decimal>,
    transaction_date: Option<NaiveDate>,
    description: Option<String>,
    category_id: Option<Uuid>,
    member_id: Option<Option<Uuid>>,
}

/// PATCH /transactions/{id} - Update a transaction (treasurer+).
async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify transactions");
    }

    let repo = TransactionRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        amount: payload.amount.map(normalize_amount),
        transaction_date: payload.transaction_date,
        description: payload.description,
        category_id: payload.category_id,
        member_id: payload.member_id,
    };

    match repo.update(id, input).await {
        Ok(transaction) => {
            let audit = AuditRepository::new((*state.db).clone());
            if let Err(e) = audit
                .record(AuditEntry {
                    action: "transaction.update".to_string(),
                    entity_type: "transaction".to_string(),
                    entity_id: Some(transaction.id),
                    detail: None,
                    user_id: user.user_id(),
                })
                .await
            {
                error!(error = %e, "Failed to record audit entry");
            }

            Json(transaction).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

/// DELETE /transactions/{id} - Delete a transaction (treasurer+).
async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot modify transactions");
    }

    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            let audit = AuditRepository::new((*state.db).clone());
            if let Err(e) = audit
                .record(AuditEntry {
                    action: "transaction.delete".to_string(),
                    entity_type: "transaction".to_string(),
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
        Err(e) => transaction_error_response(&e),
    }
}
