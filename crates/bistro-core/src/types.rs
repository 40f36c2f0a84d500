//! # Domain Types
//!
//! Core domain types used throughout Bistro POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐   ┌────────────────┐   ┌─────────────────────┐  │
//! │  │   Cashier     │   │  PosSession    │   │      Invoice        │  │
//! │  │ ───────────── │   │ ────────────── │   │ ─────────────────── │  │
//! │  │ cashier_code  │   │ cashier_id     │   │ customer            │  │
//! │  │ password_hash │   │ profile_id     │   │ pos_session_id      │  │
//! │  │ api_key       │   │ status         │   │ status              │  │
//! │  └───────────────┘   │ opening_entry  │   │ grand_total_cents   │  │
//! │                      └────────────────┘   └──────────┬──────────┘  │
//! │  ┌───────────────┐   ┌────────────────┐              │             │
//! │  │  ItemGroup    │   │     Item       │   ┌──────────▼──────────┐  │
//! │  │ ───────────── │   │ ────────────── │   │ InvoiceItem         │  │
//! │  │ parent_group  │   │ group_id       │   │ InvoicePayment      │  │
//! │  │ is_group      │   │ rate_cents     │   │ VoidedItem          │  │
//! │  └───────────────┘   └────────────────┘   └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity carries a TEXT `id`: either a UUID v4 or a business code
//! (item code, device id, client-supplied invoice id).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::Money;

// =============================================================================
// Cashier
// =============================================================================

/// A POS user who can log in at a terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Cashier {
    pub id: String,

    /// Short numeric/alphanumeric code typed at the terminal.
    pub cashier_code: String,

    /// Argon2 hash of the terminal password. Never serialized outward;
    /// handlers expose DTOs, not this struct.
    pub password_hash: String,

    pub full_name: String,
    pub email: Option<String>,
    pub enabled: bool,

    /// API key half of the bearer credential, present while logged in.
    pub api_key: Option<String>,

    /// Argon2 hash of the API secret half.
    pub api_secret_hash: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cashier Device & Printers
// =============================================================================

/// A registered physical terminal, identified by the `X-Device-Id` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashierDevice {
    pub id: String,
    pub device_name: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// One (device, print class) routing row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DevicePrinterRow {
    pub device_id: String,
    pub print_class: String,
    pub preparation_printer: String,
    pub connection_info: String,
    pub backup_printer: Option<String>,
    pub backup_connection_info: Option<String>,
}

/// Printer routing for a single print class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintClass {
    pub preparation_printer: String,
    pub connection_info: String,
    pub backup_printer: Option<String>,
    pub backup_connection_info: Option<String>,
}

/// The full printer map for one cashier device.
///
/// `print_classes` is keyed by print class name ("Hot Kitchen", "Bar", ...).
/// BTreeMap keeps the serialized order stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashierDevicePrintersMap {
    pub cashier_device_name: String,
    pub print_classes: BTreeMap<String, PrintClass>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Hierarchical category under which sellable items are organized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemGroup {
    pub id: String,
    pub group_name: String,
    pub parent_group_id: Option<String>,
    pub is_group: bool,
}

/// A sellable item. The `id` is the item code shown on tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub id: String,
    pub item_name: String,
    pub description: Option<String>,
    pub uom: String,
    pub rate_cents: i64,
    pub group_id: String,
    pub disabled: bool,
}

impl Item {
    /// Returns the standard rate as Money.
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }
}

/// A cashier-station profile. Root item groups are joined separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PosProfile {
    pub id: String,
    pub profile_name: String,
    pub disabled: bool,
}

/// One flat row of the catalog query: a group, possibly joined to one of
/// its items. Input to [`crate::catalog::build_catalog_forest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogRow {
    pub group_id: String,
    pub group_name: String,
    pub parent_group_id: Option<String>,
    pub is_group: bool,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub uom: Option<String>,
    pub rate_cents: Option<i64>,
    pub item_disabled: Option<bool>,
}

// =============================================================================
// Session Status
// =============================================================================

/// The status of a POS working session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Cashier is working; invoices attach to this session.
    Open,
    /// Closing entry recorded; session is immutable.
    Closed,
}

impl SessionStatus {
    /// Lowercase wire/storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Closed => "closed",
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Open
    }
}

// =============================================================================
// POS Session
// =============================================================================

/// A cashier's open working period linked to a POS Profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PosSession {
    pub id: String,
    pub cashier_id: String,
    pub profile_id: String,
    pub status: SessionStatus,
    pub opening_entry_id: String,
    pub closing_entry_id: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Cash declaration recorded when a session opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OpeningEntry {
    pub id: String,
    pub cashier_id: String,
    pub profile_id: String,
    pub mode_of_payment: String,
    pub amount_cents: i64,
    pub posting_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Cash declaration recorded when a session closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ClosingEntry {
    pub id: String,
    pub opening_entry_id: String,
    pub cashier_id: String,
    pub profile_id: String,
    pub amount_cents: i64,
    pub posting_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Document status of a POS invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Submitted,
    Cancelled,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

impl InvoiceStatus {
    /// Numeric docstatus as the POS client expects it
    /// (0 = draft, 1 = submitted, 2 = cancelled).
    pub fn docstatus(&self) -> i64 {
        match self {
            InvoiceStatus::Draft => 0,
            InvoiceStatus::Submitted => 1,
            InvoiceStatus::Cancelled => 2,
        }
    }

    /// Lowercase wire/storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Submitted => "submitted",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// An order/bill aggregating invoice items and payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    pub customer: String,
    pub pos_session_id: Option<String>,
    pub table_number: Option<String>,
    pub room_number: Option<String>,
    pub number_of_guests: Option<i64>,
    pub status: InvoiceStatus,
    pub grand_total_cents: i64,
    pub paid_amount_cents: i64,
    pub posting_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }

    #[inline]
    pub fn paid_amount(&self) -> Money {
        Money::from_cents(self.paid_amount_cents)
    }
}

/// A line item on an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub item_code: String,
    pub item_name: String,
    pub description: String,
    pub uom: String,
    pub qty: f64,
    pub rate_cents: i64,
    pub amount_cents: i64,
    pub folio_window: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InvoiceItem {
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// A tender row on an invoice. Split tenders produce multiple rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoicePayment {
    pub id: String,
    pub invoice_id: String,
    pub mode_of_payment: String,
    pub amount_cents: i64,
    pub account: Option<String>,
    pub folio_window: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A full invoice document: header plus child rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
    pub payments: Vec<InvoicePayment>,
}

/// Audit record written when an invoice item is voided.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VoidedItem {
    pub id: String,
    pub invoice_id: String,
    pub item_code: String,
    pub qty: f64,
    pub cause: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Currency
// =============================================================================

/// A currency with its exchange rate against the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CurrencyRate {
    pub name: String,
    pub exchange_rate: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_default() {
        assert_eq!(SessionStatus::default(), SessionStatus::Open);
    }

    #[test]
    fn test_invoice_status_docstatus() {
        assert_eq!(InvoiceStatus::Draft.docstatus(), 0);
        assert_eq!(InvoiceStatus::Submitted.docstatus(), 1);
        assert_eq!(InvoiceStatus::Cancelled.docstatus(), 2);
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Open).unwrap(),
            "\"open\""
        );
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_item_rate_money() {
        let item = Item {
            id: "BURGER".to_string(),
            item_name: "Burger".to_string(),
            description: None,
            uom: "Unit".to_string(),
            rate_cents: 5000,
            group_id: "FOOD".to_string(),
            disabled: false,
        };
        assert_eq!(item.rate().to_major(), 50.0);
    }
}
