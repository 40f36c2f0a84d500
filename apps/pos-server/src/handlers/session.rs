//! # Session Handlers
//!
//! POS session open/close/active, the session's invoice list, and the
//! currency listing for the tender screen.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentCashier;
use crate::error::ApiError;
use crate::AppState;
use bistro_core::validation::validate_amount;
use bistro_core::{
    CoreError, CurrencyRate, Invoice, Money, PosSession, SessionStatus, DEFAULT_MODE_OF_PAYMENT,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub pos_profile: String,
    #[serde(default)]
    pub opening_cash: f64,
}

#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    pub success: bool,
    pub session: String,
    pub opening_entry: String,
}

#[derive(Debug, Deserialize)]
pub struct CloseSessionRequest {
    pub session: String,
    #[serde(default)]
    pub closing_cash: f64,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub success: bool,
    pub session: String,
    pub closing_entry: String,
}

/// Invoice summary row of the session invoice list.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub customer: String,
    pub grand_total: f64,
    pub paid_amount: f64,
    pub status: &'static str,
    pub table_number: Option<String>,
    pub room_number: Option<String>,
    pub posting_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for OrderSummary {
    fn from(inv: Invoice) -> Self {
        OrderSummary {
            id: inv.id,
            customer: inv.customer,
            grand_total: Money::from_cents(inv.grand_total_cents).to_major(),
            paid_amount: Money::from_cents(inv.paid_amount_cents).to_major(),
            status: inv.status.as_str(),
            table_number: inv.table_number,
            room_number: inv.room_number,
            posting_date: inv.posting_date,
            created_at: inv.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub success: bool,
    pub count: usize,
    pub orders: Vec<OrderSummary>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/pos/session/active` - most recent open session for the
/// authenticated cashier, or `null`.
pub async fn find_active(
    State(state): State<AppState>,
    Extension(CurrentCashier(cashier)): Extension<CurrentCashier>,
) -> Result<Json<Option<PosSession>>, ApiError> {
    let session = state.db.sessions().find_active(&cashier.id).await?;
    Ok(Json(session))
}

/// `POST /api/pos/session/open` - open a session on a profile.
///
/// Rejected with 409 when the cashier already has an open session on the
/// same profile. Creates the opening cash entry and the session in one
/// transaction.
pub async fn open(
    State(state): State<AppState>,
    Extension(CurrentCashier(cashier)): Extension<CurrentCashier>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<Json<OpenSessionResponse>, ApiError> {
    validate_amount("opening_cash", req.opening_cash)?;

    let profile = state
        .db
        .catalog()
        .get_active_profile(&req.pos_profile)
        .await?
        .ok_or_else(|| CoreError::ProfileNotFound(req.pos_profile.clone()))?;

    if state
        .db
        .sessions()
        .has_open_session(&cashier.id, &profile.id)
        .await?
    {
        return Err(CoreError::OpenSessionExists {
            cashier: cashier.cashier_code.clone(),
            profile: profile.id.clone(),
        }
        .into());
    }

    let (session, opening) = state
        .db
        .sessions()
        .open_session(
            &cashier.id,
            &profile.id,
            Money::from_major(req.opening_cash),
            DEFAULT_MODE_OF_PAYMENT,
        )
        .await?;

    info!(session = %session.id, profile = %profile.id, "POS session opened");

    Ok(Json(OpenSessionResponse {
        success: true,
        session: session.id,
        opening_entry: opening.id,
    }))
}

/// `POST /api/pos/session/close` - close an open session.
pub async fn close(
    State(state): State<AppState>,
    Json(req): Json<CloseSessionRequest>,
) -> Result<Json<CloseSessionResponse>, ApiError> {
    validate_amount("closing_cash", req.closing_cash)?;

    let session = state
        .db
        .sessions()
        .get(&req.session)
        .await?
        .ok_or_else(|| CoreError::SessionNotFound(req.session.clone()))?;

    if session.status != SessionStatus::Open {
        return Err(CoreError::SessionNotOpen {
            session: session.id,
            status: session.status.as_str().to_string(),
        }
        .into());
    }

    let (session, closing) = state
        .db
        .sessions()
        .close_session(&req.session, Money::from_major(req.closing_cash))
        .await?;

    info!(session = %session.id, "POS session closed");

    Ok(Json(CloseSessionResponse {
        success: true,
        session: session.id,
        closing_entry: closing.id,
    }))
}

/// `GET /api/pos/session/:id/invoices` - invoices of a session, newest
/// first.
pub async fn invoice_list(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    state
        .db
        .sessions()
        .get(&session_id)
        .await?
        .ok_or_else(|| CoreError::SessionNotFound(session_id.clone()))?;

    let orders: Vec<OrderSummary> = state
        .db
        .invoices()
        .list_for_session(&session_id)
        .await?
        .into_iter()
        .map(OrderSummary::from)
        .collect();

    Ok(Json(InvoiceListResponse {
        success: true,
        count: orders.len(),
        orders,
    }))
}

/// `GET /api/pos/currencies` - base currency plus exchange-rate rows.
pub async fn currency_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CurrencyRate>>, ApiError> {
    let rates = state
        .db
        .currencies()
        .list_rates(&state.config.base_currency)
        .await?;
    Ok(Json(rates))
}
