//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the point ledger
//! - Application state shared across handlers
//! - Error-to-response mapping

pub mod routes;

use std::sync::Arc;

use axum::Router;
use pointledger_core::ledger::LedgerService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger service owning all balance mutations.
    pub ledger: Arc<LedgerService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
