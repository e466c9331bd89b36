//! Simple REST API server example for the points ledger.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /api/addition` - Record an array of grants, in array order
//! - `POST /api/deduction` - Spend points for a user
//! - `GET /api/balance?user=<id>` - Per-payer balance for a user
//!
//! ## Example Usage
//!
//! ```bash
//! # Grants
//! curl -X POST http://localhost:3000/api/addition \
//!   -H "Content-Type: application/json" \
//!   -d '[{"user": "alice", "payer": "DANNON", "points": 1000, "date": "2020-11-02T14:00:00Z"},
//!        {"user": "alice", "payer": "UNILEVER", "points": 200, "date": "2020-10-31T11:00:00Z"}]'
//!
//! # Spend
//! curl -X POST http://localhost:3000/api/deduction \
//!   -H "Content-Type: application/json" \
//!   -d '{"user": "alice", "points": 500}'
//!
//! # Balance
//! curl "http://localhost:3000/api/balance?user=alice"
//! ```

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use points_ledger_rs::{BalanceItem, Grant, Ledger, Spend, SpendItem, UserId};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request DTOs ===

/// Query string for the balance endpoint.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub user: UserId,
}

// === Application State ===

/// Shared application state containing the ledger.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

// === Handlers ===

/// POST /api/addition - Record grants in array order.
async fn add_points(State(state): State<AppState>, Json(grants): Json<Vec<Grant>>) -> StatusCode {
    state.ledger.record_grants(grants);
    StatusCode::OK
}

/// POST /api/deduction - Spend points oldest-first.
async fn deduct_points(
    State(state): State<AppState>,
    Json(spend): Json<Spend>,
) -> Json<Vec<SpendItem>> {
    Json(state.ledger.spend(spend))
}

/// GET /api/balance - Per-payer balance for a user.
async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Json<Vec<BalanceItem>> {
    Json(state.ledger.balance(&query.user))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/addition", post(add_points))
        .route("/api/deduction", post(deduct_points))
        .route("/api/balance", get(get_balance))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::var("POINTS_LEDGER_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let state = AppState {
        ledger: Arc::new(Ledger::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    println!("Points ledger API server running on http://{addr}");
    println!();
    println!("Endpoints:");
    println!("  POST /api/addition          - Record grants");
    println!("  POST /api/deduction         - Spend points");
    println!("  GET  /api/balance?user=<id> - Balance per payer");

    axum::serve(listener, app).await?;
    Ok(())
}
