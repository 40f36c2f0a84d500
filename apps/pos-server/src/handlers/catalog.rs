//! # Catalog Handlers
//!
//! Nested item-group/item retrieval: either for the authenticated
//! cashier's active session profile, or for an explicitly named profile.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::auth::CurrentCashier;
use crate::error::ApiError;
use crate::AppState;
use bistro_core::{build_catalog_forest, CoreError, GroupNode};

// =============================================================================
// DTOs
// =============================================================================

/// Catalog payload. `ok: false` carries a message instead of groups,
/// matching what terminals expect for an empty profile.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CatalogResponse {
    fn found(profile: String, groups: Vec<GroupNode>) -> Self {
        CatalogResponse {
            ok: true,
            pos_profile: Some(profile),
            groups: Some(groups),
            message: None,
        }
    }

    fn empty(message: impl Into<String>) -> Self {
        CatalogResponse {
            ok: false,
            pos_profile: None,
            groups: None,
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/pos/catalog` - catalog for the active session's profile.
pub async fn active_session_catalog(
    State(state): State<AppState>,
    Extension(CurrentCashier(cashier)): Extension<CurrentCashier>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let Some(session) = state.db.sessions().find_active(&cashier.id).await? else {
        return Ok(Json(CatalogResponse::empty(
            "No active POS session for user",
        )));
    };

    let response = build_profile_catalog(&state, &session.profile_id).await?;
    Ok(Json(response))
}

/// `GET /api/pos/profile/:profile/catalog` - catalog for a named profile.
pub async fn profile_catalog(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<CatalogResponse>, ApiError> {
    state
        .db
        .catalog()
        .get_active_profile(&profile_id)
        .await?
        .ok_or_else(|| CoreError::ProfileNotFound(profile_id.clone()))?;

    let response = build_profile_catalog(&state, &profile_id).await?;
    Ok(Json(response))
}

/// Loads the flat rows for a profile's root groups and assembles the
/// forest.
async fn build_profile_catalog(
    state: &AppState,
    profile_id: &str,
) -> Result<CatalogResponse, ApiError> {
    let catalog = state.db.catalog();

    let roots = catalog.profile_root_groups(profile_id).await?;
    if roots.is_empty() {
        return Ok(CatalogResponse::empty(
            "No item groups found for POS Profile",
        ));
    }

    let rows = catalog.catalog_rows(&roots).await?;
    let groups = build_catalog_forest(&rows, &roots);

    Ok(CatalogResponse::found(profile_id.to_string(), groups))
}
