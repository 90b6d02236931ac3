//! Dashboard route: per-fund balances and the consolidated total.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use caja_core::ledger::{FundActivity, LedgerAggregator, check_conservation};
use caja_db::{EventRepository, LedgerRepository};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[derive(Debug, Deserialize, Default)]
struct DashboardQuery {
    /// Optional point-in-time cutoff (inclusive).
    as_of: Option<NaiveDate>,
}

/// One event fund on the dashboard, with its metadata.
#[derive(Debug, Serialize)]
struct EventFund {
    id: Uuid,
    name: String,
    status: String,
    activity: FundActivity,
}

/// Dashboard payload.
#[derive(Debug, Serialize)]
struct DashboardResponse {
    general: FundActivity,
    events: Vec<EventFund>,
    orphans: std::collections::BTreeMap<Uuid, FundActivity>,
    consolidated_total: rust_decimal::Decimal,
    /// Set when the conservation check fails; the balances shown cannot
    /// all be trusted and the ledger needs investigation.
    inconsistent: bool,
    as_of: Option<NaiveDate>,
}

/// GET /dashboard - Balance per fund plus the consolidated total.
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
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

    let summary = LedgerAggregator::aggregate(
        &snapshot.transactions,
        &snapshot.transfers,
        &snapshot.known_event_ids,
        query.as_of,
    );

    // The conservation law must hold over the same cutoff the summary
    // used; comparing against the full history would false-alarm.
    let checked: Vec<_> = match query.as_of {
        Some(cutoff) => snapshot
            .transactions
            .iter()
            .filter(|t| t.date <= cutoff)
            .cloned()
            .collect(),
        None => snapshot.transactions.clone(),
    };

    let inconsistent = match check_conservation(&summary, &checked) {
        Ok(()) => false,
        Err(e) => {
            error!(error = %e, "Ledger conservation violation");
            true
        }
    };

    let event_repo = EventRepository::new((*state.db).clone());
    let events = match event_repo.list(None).await {
        Ok(events) => events,
        Err(e) => {
            error!(error = %e, "Failed to list events for dashboard");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to load events"
                })),
            )
                .into_response();
        }
    };

    let event_funds = events
        .into_iter()
        .map(|event| {
            let activity = summary.events.get(&event.id).cloned().unwrap_or_default();
            EventFund {
                id: event.id,
                name: event.name,
                status: match event.status {
                    caja_db::entities::sea_orm_active_enums::EventStatus::Active => {
                        "active".to_string()
                    }
                    caja_db::entities::sea_orm_active_enums::EventStatus::Finalized => {
                        "finalized".to_string()
                    }
                },
                activity,
            }
        })
        .collect();

    Json(DashboardResponse {
        general: summary.general,
        events: event_funds,
        orphans: summary.orphans,
        consolidated_total: summary.consolidated_total,
        inconsistent,
        as_of: query.as_of,
    })
    .into_response()
}
