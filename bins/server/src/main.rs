//! Caja API Server
//!
//! Main entry point for the Caja backend service.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caja_api::{AppState, create_router};
use caja_db::{SessionRepository, connect};
use caja_shared::{AppConfig, JwtConfig, JwtService, types::parse_amount};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caja=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Clear out sessions that expired while the server was down
    let sessions = SessionRepository::new(db.clone());
    match sessions.delete_expired().await {
        Ok(removed) if removed > 0 => info!(removed, "Removed expired sessions"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to clean up expired sessions"),
    }

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
        #[allow(clippy::cast_possible_wrap)]
        refresh_token_expires_days: (config.jwt.refresh_token_expiry_secs / 86400) as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Fallback monthly dues amount (the global setting overrides it)
    let monthly_dues = parse_amount(&config.ledger.monthly_dues).unwrap_or_else(|e| {
        warn!(
            value = %config.ledger.monthly_dues,
            error = %e,
            "Invalid monthly dues in config, using 10.00"
        );
        Decimal::new(1000, 2)
    });

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        monthly_dues,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
