//! # Bistro POS Server
//!
//! HTTP RPC surface for POS terminals.
//!
//! ## Route Map
//! ```text
//! /api/pos
//! ├── POST /login                        (public)
//! ├── GET  /printers                     (public)
//! ├── GET  /health                       (public)
//! │
//! ├── POST /logout                       (token)
//! ├── GET  /session-info                 (token)
//! ├── GET  /currencies                   (token)
//! │
//! ├── GET  /session/active               (token + device)
//! ├── POST /session/open                 (token + device)
//! ├── POST /session/close                (token + device)
//! ├── GET  /session/:id/invoices         (token + device)
//! ├── GET  /catalog                      (token + device)
//! ├── GET  /profile/:profile/catalog     (token + device)
//! ├── PUT  /invoice/:id                  (token + device)
//! ├── POST /invoice/:id/items            (token + device)
//! └── POST /invoice/item/void            (token + device)
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorCode};

use bistro_db::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates application state from its parts.
    pub fn new(db: Database, config: ServerConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the full RPC router over the given state.
pub fn router(state: AppState) -> Router {
    // POS operations: token auth plus the device guard.
    let device_routes = Router::new()
        .route("/session/active", get(handlers::session::find_active))
        .route("/session/open", post(handlers::session::open))
        .route("/session/close", post(handlers::session::close))
        .route("/session/:id/invoices", get(handlers::session::invoice_list))
        .route("/catalog", get(handlers::catalog::active_session_catalog))
        .route("/profile/:profile/catalog", get(handlers::catalog::profile_catalog))
        .route(
            "/invoice/:id",
            put(handlers::invoice::upsert).post(handlers::invoice::upsert),
        )
        .route("/invoice/:id/items", post(handlers::invoice::bulk_upsert_items))
        .route("/invoice/item/void", post(handlers::invoice::void_item))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_device,
        ));

    // Account operations: token auth only.
    let token_routes = Router::new()
        .merge(device_routes)
        .route("/logout", post(handlers::auth::logout))
        .route("/session-info", get(handlers::auth::session_info))
        .route("/currencies", get(handlers::session::currency_list))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    let public_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/printers", get(handlers::printing::printers_map))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/pos", public_routes.merge(token_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
