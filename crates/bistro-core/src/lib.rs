//! # bistro-core: Pure Business Logic for Bistro POS
//!
//! This crate is the heart of Bistro POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Bistro POS Architecture                       │
//! │                                                                 │
//! │  POS Terminal Client                                            │
//! │        │ HTTP RPC                                               │
//! │  ┌─────▼───────────────────────────────────────────────────┐   │
//! │  │                 apps/pos-server                          │   │
//! │  │   login, session open/close, catalog, invoice upsert    │   │
//! │  └─────┬───────────────────────────────────────────────────┘   │
//! │        │                                                        │
//! │  ┌─────▼───────────────────────────────────────────────────┐   │
//! │  │            ★ bistro-core (THIS CRATE) ★                  │   │
//! │  │                                                          │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────────┐   │   │
//! │  │   │  types  │ │  money  │ │ catalog │ │ validation │   │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └────────────┘   │   │
//! │  │                                                          │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS    │   │
//! │  └─────┬───────────────────────────────────────────────────┘   │
//! │        │                                                        │
//! │  ┌─────▼───────────────────────────────────────────────────┐   │
//! │  │               bistro-db (Database Layer)                 │   │
//! │  │        SQLite queries, migrations, repositories          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Cashier, PosSession, Invoice, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Recursive item-group forest assembly
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{build_catalog_forest, root_group_ids, GroupNode};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Unit of measure applied when a line item arrives without one.
pub const DEFAULT_UOM: &str = "Unit";

/// Mode of payment recorded on opening entries.
pub const DEFAULT_MODE_OF_PAYMENT: &str = "Cash";

/// Token scheme name returned by login and expected in the
/// `Authorization` header (`token <api_key>:<api_secret>`).
pub const TOKEN_TYPE: &str = "token";
