//! Pointledger API Server
//!
//! Main entry point for the point ledger service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pointledger_api::{AppState, create_router};
use pointledger_core::ledger::LedgerService;
use pointledger_shared::AppConfig;
use pointledger_store::{InMemoryBalanceStore, InMemoryHistoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pointledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Wire the ledger service over in-memory stores
    let ledger = LedgerService::new(
        Arc::new(InMemoryBalanceStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
        config.ledger.max_balance,
    );
    info!(max_balance = config.ledger.max_balance, "Ledger service configured");

    // Create application state
    let state = AppState {
        ledger: Arc::new(ledger),
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
