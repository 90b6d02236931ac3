//! Period report route.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use caja_core::reports::ReportService;
use caja_db::LedgerRepository;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports", get(period_report))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    from: NaiveDate,
    to: NaiveDate,
}

/// GET /reports?from=&to= - Financial report for an inclusive date range.
async fn period_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    if query.from > query.to {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_range",
                "message": "Report range start must not be after its end"
            })),
        )
            .into_response();
    }

    let ledger_repo = LedgerRepository::new((*state.db).clone());
    let snapshot = match ledger_repo.load_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "Failed to load ledger snapshot");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to load ledger"
                })),
            )
                .into_response();
        }
    };

    let report = ReportService::period_report(
        query.from,
        query.to,
        &snapshot.transactions,
        &snapshot.transfers,
        &snapshot.known_event_ids,
    );

    Json(report).into_response()
}
