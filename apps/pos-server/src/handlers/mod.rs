//! # RPC Handlers
//!
//! One module per API area, mirroring the RPC groups the POS client
//! calls:
//!
//! - [`auth`] - login, logout, session info
//! - [`session`] - session open/close/active, invoice list, currencies
//! - [`catalog`] - item-group hierarchy retrieval
//! - [`invoice`] - invoice upsert, item bulk upsert, item void
//! - [`printing`] - cashier-device printer maps

pub mod auth;
pub mod catalog;
pub mod invoice;
pub mod printing;
pub mod session;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}

/// `GET /api/pos/health` - liveness plus a database round trip.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.db.health_check().await;
    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
