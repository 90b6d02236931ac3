//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod audit;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod import;
pub mod members;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod transfers;
pub mod users;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(members::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
        .merge(transfers::routes())
        .merge(events::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .merge(settings::routes())
        .merge(audit::routes())
        .merge(import::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
