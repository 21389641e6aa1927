//! Point balance routes.
//!
//! The request layer stays thin: decode, delegate to the ledger service,
//! map the typed error taxonomy onto status codes. All business rules
//! live in `pointledger-core`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use pointledger_core::ledger::{BalanceRecord, HistoryEntry, LedgerError, TransactionKind};
use pointledger_shared::EntityId;

use crate::AppState;

/// Creates the point routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/points/{id}", get(get_point))
        .route("/points/{id}/histories", get(get_histories))
        .route("/points/{id}/charge", patch(charge_point))
        .route("/points/{id}/use", patch(use_point))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for charging points.
#[derive(Debug, Deserialize)]
pub struct ChargeRequest {
    /// Amount to charge.
    pub amount: i64,
}

/// Request body for using points.
#[derive(Debug, Deserialize)]
pub struct UseRequest {
    /// Amount to use.
    pub amount: i64,
}

/// Response for a point balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Entity ID.
    pub id: i64,
    /// Current balance.
    pub balance: i64,
    /// Last mutation timestamp.
    pub updated_at: String,
}

impl From<BalanceRecord> for BalanceResponse {
    fn from(record: BalanceRecord) -> Self {
        Self {
            id: record.entity_id.into_inner(),
            balance: record.balance,
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// Response for a single history entry.
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    /// Store-assigned sequence ID.
    pub id: i64,
    /// Entity ID.
    pub entity_id: i64,
    /// Mutation amount.
    pub amount: i64,
    /// Mutation kind.
    pub kind: TransactionKind,
    /// When the mutation was accepted.
    pub created_at: String,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            entity_id: entry.entity_id.into_inner(),
            amount: entry.amount,
            kind: entry.kind,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// Maps a ledger error onto its HTTP response.
fn error_response(err: &LedgerError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/points/{id}` - Current balance; unknown entities read as zero.
async fn get_point(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let record = state.ledger.balance(EntityId::new(id)).await;
    (StatusCode::OK, Json(BalanceResponse::from(record))).into_response()
}

/// GET `/points/{id}/histories` - All accepted mutations in order.
async fn get_histories(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.ledger.history(EntityId::new(id)).await {
        Ok(entries) => {
            let items: Vec<HistoryEntryResponse> =
                entries.into_iter().map(HistoryEntryResponse::from).collect();
            (StatusCode::OK, Json(json!({ "histories": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// PATCH `/points/{id}/charge` - Charge points onto a balance.
async fn charge_point(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChargeRequest>,
) -> impl IntoResponse {
    info!(id, amount = payload.amount, "charge requested");
    match state.ledger.charge(EntityId::new(id), payload.amount).await {
        Ok(record) => (StatusCode::OK, Json(BalanceResponse::from(record))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PATCH `/points/{id}/use` - Use points from a balance.
async fn use_point(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UseRequest>,
) -> impl IntoResponse {
    info!(id, amount = payload.amount, "use requested");
    match state
        .ledger
        .use_points(EntityId::new(id), payload.amount)
        .await
    {
        Ok(record) => (StatusCode::OK, Json(BalanceResponse::from(record))).into_response(),
        Err(e) => error_response(&e),
    }
}
