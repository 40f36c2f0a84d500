//! # Printing Handlers
//!
//! Cashier-device printer maps. Public (no token): terminals fetch their
//! print routing before any cashier logs in.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;
use bistro_core::CashierDevicePrintersMap;

#[derive(Debug, Deserialize)]
pub struct PrintersQuery {
    pub cashier_device_name: Option<String>,
}

/// `GET /api/pos/printers?cashier_device_name=...` - printer maps,
/// optionally filtered to one device. An unknown filter device yields an
/// empty list rather than an error.
pub async fn printers_map(
    State(state): State<AppState>,
    Query(query): Query<PrintersQuery>,
) -> Result<Json<Vec<CashierDevicePrintersMap>>, ApiError> {
    if let Some(name) = query.cashier_device_name.as_deref() {
        if !state.db.devices().exists(name).await? {
            return Ok(Json(Vec::new()));
        }
    }

    let maps = state
        .db
        .printing()
        .printers_map(query.cashier_device_name.as_deref())
        .await?;

    Ok(Json(maps))
}
