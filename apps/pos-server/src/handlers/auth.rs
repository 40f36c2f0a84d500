//! # Auth Handlers
//!
//! Cashier login/logout and session info.
//!
//! ## Login Flow
//! ```text
//! POST /login { cashier_code, cashier_password }
//!      │
//!      ├── look up enabled cashier by code ── none → 401
//!      ├── verify password (argon2)        ── fail → 401
//!      ├── rotate API credentials (fresh key + secret, secret stored hashed)
//!      │
//!      ▼
//! { success, authorization: "<key>:<secret>", token_type: "token", ... }
//! ```
//!
//! Every login rotates the credential pair; the previous token stops
//! working. Logout clears it.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{generate_credential, CurrentCashier};
use crate::error::ApiError;
use crate::AppState;
use bistro_core::validation::validate_required;
use bistro_core::{CoreError, TOKEN_TYPE};
use bistro_db::{hash_secret, verify_secret};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub cashier_code: String,
    pub cashier_password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    /// `<api_key>:<api_secret>`; send back as `Authorization: token <...>`.
    pub authorization: String,
    pub token_type: &'static str,
    pub user: String,
    pub full_name: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionInfoResponse {
    pub success: bool,
    pub user: UserInfo,
    pub session: SessionContext,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub cashier_code: String,
    pub full_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionContext {
    pub token_type: &'static str,
    pub currency: String,
    pub time_zone: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/pos/login` - cashier login with terminal code + password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let code = validate_required("cashier_code", &req.cashier_code)?;

    let cashier = state
        .db
        .cashiers()
        .find_enabled_by_code(&code)
        .await?
        .ok_or(CoreError::UserNotFound)?;

    if !verify_secret(&req.cashier_password, &cashier.password_hash) {
        return Err(ApiError::auth("Invalid cashier credentials"));
    }

    let api_key = generate_credential();
    let api_secret = generate_credential();
    let secret_hash = hash_secret(&api_secret)?;

    state
        .db
        .cashiers()
        .rotate_credentials(&cashier.id, &api_key, &secret_hash)
        .await?;

    info!(cashier = %cashier.cashier_code, "Cashier logged in");

    Ok(Json(LoginResponse {
        success: true,
        authorization: format!("{api_key}:{api_secret}"),
        token_type: TOKEN_TYPE,
        user: cashier.id,
        full_name: cashier.full_name,
        message: "Login successful",
    }))
}

/// `GET /api/pos/session-info` - the authenticated cashier's context.
pub async fn session_info(
    State(state): State<AppState>,
    Extension(CurrentCashier(cashier)): Extension<CurrentCashier>,
) -> Json<SessionInfoResponse> {
    Json(SessionInfoResponse {
        success: true,
        user: UserInfo {
            id: cashier.id,
            cashier_code: cashier.cashier_code,
            full_name: cashier.full_name,
            email: cashier.email,
        },
        session: SessionContext {
            token_type: TOKEN_TYPE,
            currency: state.config.base_currency.clone(),
            time_zone: state.config.time_zone.clone(),
        },
        timestamp: Utc::now(),
    })
}

/// `POST /api/pos/logout` - clears the stored API credentials.
pub async fn logout(
    State(state): State<AppState>,
    Extension(CurrentCashier(cashier)): Extension<CurrentCashier>,
) -> Result<Json<LogoutResponse>, ApiError> {
    state.db.cashiers().clear_credentials(&cashier.id).await?;

    info!(cashier = %cashier.cashier_code, "Cashier logged out");

    Ok(Json(LogoutResponse {
        success: true,
        message: "Logout successful",
        timestamp: Utc::now(),
    }))
}
