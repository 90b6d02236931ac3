//! Batch transaction import route.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    middleware::auth::{AuthUser, forbidden},
    routes::transactions::{CreateTransactionRequest, transaction_error_response},
};
use caja_db::TransactionRepository;

/// Creates the import routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/import/transactions", post(import_transactions))
}

#[derive(Debug, Deserialize)]
struct ImportRequest {
    transactions: Vec<CreateTransactionRequest>,
}

/// POST /import/transactions - Import a batch of transactions (treasurer+).
///
/// The batch is all-or-nothing: every row is validated up front and any
/// rejection leaves the ledger untouched.
async fn import_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ImportRequest>,
) -> impl IntoResponse {
    if !user.can_write() {
        return forbidden("Viewers cannot import transactions");
    }

    if payload.transactions.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "empty_import",
                "message": "Import contains no transactions"
            })),
        )
            .into_response();
    }

    let inputs = payload
        .transactions
        .into_iter()
        .map(|row| row.into_input(user.user_id()))
        .collect();

    let repo = TransactionRepository::new((*state.db).clone());

    match repo.import_batch(inputs, user.user_id()).await {
        Ok(imported) => {
            info!(rows = imported.len(), "Transactions imported");
            (
                StatusCode::CREATED,
                Json(json!({ "imported": imported.len(), "transactions": imported })),
            )
                .into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}
