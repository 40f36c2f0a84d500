//! # bistro-db: Database Layer for Bistro POS
//!
//! SQLite persistence behind typed repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  pos-server handlers                                            │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  Database (pool handle)                                         │
//! │   ├── cashiers()   ── CashierRepository                         │
//! │   ├── devices()    ── DeviceRepository                          │
//! │   ├── sessions()   ── SessionRepository                         │
//! │   ├── invoices()   ── InvoiceRepository                         │
//! │   ├── catalog()    ── CatalogRepository                         │
//! │   ├── printing()   ── PrintingRepository                        │
//! │   └── currencies() ── CurrencyRepository                        │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  SQLite (WAL mode, embedded migrations)                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use bistro_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./bistro-pos.db")).await?;
//! let session = db.sessions().find_active(&cashier_id).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// Re-exports for convenience
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::cashier::{hash_secret, verify_secret, CashierRepository};
pub use repository::catalog::CatalogRepository;
pub use repository::currency::CurrencyRepository;
pub use repository::device::DeviceRepository;
pub use repository::invoice::{
    InvoicePatch, InvoiceRepository, ItemUpsertRow, NewPaymentRow,
};
pub use repository::printing::PrintingRepository;
pub use repository::session::SessionRepository;
