//! # Repository Module
//!
//! Database repository implementations for Bistro POS.
//!
//! Each repository wraps the shared pool behind a typed API; SQL lives
//! here and nowhere else. Multi-step writes (session open/close, invoice
//! upsert, bulk item upsert, void) run in explicit transactions.
//!
//! ## Available Repositories
//!
//! - [`cashier::CashierRepository`] - cashier accounts and API credentials
//! - [`device::DeviceRepository`] - registered cashier devices
//! - [`session::SessionRepository`] - POS sessions, opening/closing entries
//! - [`invoice::InvoiceRepository`] - invoices, items, payments, void bin
//! - [`catalog::CatalogRepository`] - profiles, item groups, catalog rows
//! - [`printing::PrintingRepository`] - device printer maps
//! - [`currency::CurrencyRepository`] - currency exchange listing

pub mod cashier;
pub mod catalog;
pub mod currency;
pub mod device;
pub mod invoice;
pub mod printing;
pub mod session;
