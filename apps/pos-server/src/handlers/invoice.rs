//! # Invoice Handlers
//!
//! Invoice upsert, item bulk upsert, and item void.
//!
//! ## Upsert Semantics
//! ```text
//! PUT /invoice/:id  { customer?, table_number?, ..., payments?: [...] }
//!      │
//!      ├── id exists?  ── yes → update provided header fields
//!      │                ── no  → create (customer required)
//!      ├── payments present? → replace ALL payment rows
//!      └── totals recomputed; full document returned
//! ```
//!
//! The bulk upsert reproduces the stored-procedure contract of the
//! original system: all rows in one transaction, rows with a known row
//! id updated in place, missing descriptive fields defaulted best-effort.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentCashier;
use crate::error::ApiError;
use crate::AppState;
use bistro_core::validation::{
    validate_amount, validate_guest_count, validate_payment_amount, validate_qty,
    validate_required,
};
use bistro_core::{
    CoreError, InvoiceDocument, InvoiceItem, InvoicePayment, Money, DEFAULT_UOM,
};
use bistro_db::{InvoicePatch, ItemUpsertRow, NewPaymentRow};

// =============================================================================
// Wire DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct InvoiceUpsertRequest {
    pub customer: Option<String>,
    pub number_of_guests: Option<i64>,
    pub room_number: Option<String>,
    pub table_number: Option<String>,
    pub pos_session: Option<String>,
    pub payments: Option<Vec<PaymentInput>>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentInput {
    pub mode_of_payment: String,
    pub amount: f64,
    pub account: Option<String>,
    pub folio_window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceUpsertResponse {
    pub ok: bool,
    pub invoice_id: String,
    pub docstatus: i64,
    pub invoice: InvoiceDto,
}

/// Full invoice document with major-unit amounts for the wire.
#[derive(Debug, Serialize)]
pub struct InvoiceDto {
    pub id: String,
    pub customer: String,
    pub pos_session_id: Option<String>,
    pub table_number: Option<String>,
    pub room_number: Option<String>,
    pub number_of_guests: Option<i64>,
    pub status: &'static str,
    pub docstatus: i64,
    pub grand_total: f64,
    pub paid_amount: f64,
    pub posting_date: chrono::NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub items: Vec<InvoiceItemDto>,
    pub payments: Vec<PaymentRowDto>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceItemDto {
    pub id: String,
    pub item_code: String,
    pub item_name: String,
    pub description: String,
    pub uom: String,
    pub qty: f64,
    pub rate: f64,
    pub amount: f64,
    pub folio_window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentRowDto {
    pub id: String,
    pub mode_of_payment: String,
    pub amount: f64,
    pub account: Option<String>,
    pub folio_window: Option<String>,
}

impl From<InvoiceItem> for InvoiceItemDto {
    fn from(item: InvoiceItem) -> Self {
        InvoiceItemDto {
            id: item.id,
            item_code: item.item_code,
            item_name: item.item_name,
            description: item.description,
            uom: item.uom,
            qty: item.qty,
            rate: Money::from_cents(item.rate_cents).to_major(),
            amount: Money::from_cents(item.amount_cents).to_major(),
            folio_window: item.folio_window,
        }
    }
}

impl From<InvoicePayment> for PaymentRowDto {
    fn from(p: InvoicePayment) -> Self {
        PaymentRowDto {
            id: p.id,
            mode_of_payment: p.mode_of_payment,
            amount: Money::from_cents(p.amount_cents).to_major(),
            account: p.account,
            folio_window: p.folio_window,
        }
    }
}

impl From<InvoiceDocument> for InvoiceDto {
    fn from(doc: InvoiceDocument) -> Self {
        let inv = doc.invoice;
        InvoiceDto {
            id: inv.id,
            customer: inv.customer,
            pos_session_id: inv.pos_session_id,
            table_number: inv.table_number,
            room_number: inv.room_number,
            number_of_guests: inv.number_of_guests,
            status: inv.status.as_str(),
            docstatus: inv.status.docstatus(),
            grand_total: Money::from_cents(inv.grand_total_cents).to_major(),
            paid_amount: Money::from_cents(inv.paid_amount_cents).to_major(),
            posting_date: inv.posting_date,
            created_at: inv.created_at,
            updated_at: inv.updated_at,
            items: doc.items.into_iter().map(InvoiceItemDto::from).collect(),
            payments: doc.payments.into_iter().map(PaymentRowDto::from).collect(),
        }
    }
}

// =============================================================================
// Invoice Upsert
// =============================================================================

/// `PUT /api/pos/invoice/:id` - create or update an invoice.
pub async fn upsert(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Json(req): Json<InvoiceUpsertRequest>,
) -> Result<Json<InvoiceUpsertResponse>, ApiError> {
    let invoice_id = validate_required("invoice_id", &invoice_id)?;

    if let Some(guests) = req.number_of_guests {
        validate_guest_count(guests)?;
    }

    // A provided session reference must name a real session; FK errors
    // alone would not tell the terminal which reference broke.
    if let Some(session_id) = req.pos_session.as_deref() {
        state
            .db
            .sessions()
            .get(session_id)
            .await?
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;
    }

    let payments = match req.payments {
        Some(rows) => Some(validate_payments(rows)?),
        None => None,
    };

    let patch = InvoicePatch {
        customer: req
            .customer
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        pos_session_id: req.pos_session,
        table_number: req.table_number,
        room_number: req.room_number,
        number_of_guests: req.number_of_guests,
    };

    let repo = state.db.invoices();
    let existing = repo.get(&invoice_id).await?;

    let doc = match existing {
        Some(_) => repo.update_invoice(&invoice_id, patch, payments).await?,
        None => {
            let customer = patch.customer.clone().ok_or(CoreError::CustomerRequired)?;
            repo.create_invoice(&invoice_id, &customer, patch, payments)
                .await?
        }
    };

    info!(invoice = %invoice_id, "Invoice upserted");

    Ok(Json(InvoiceUpsertResponse {
        ok: true,
        invoice_id,
        docstatus: doc.invoice.status.docstatus(),
        invoice: doc.into(),
    }))
}

fn validate_payments(rows: Vec<PaymentInput>) -> Result<Vec<NewPaymentRow>, ApiError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if row.mode_of_payment.trim().is_empty() {
            return Err(ApiError::validation(
                "Each payment must have mode_of_payment and amount",
            ));
        }
        validate_payment_amount(row.amount)?;
        out.push(NewPaymentRow {
            mode_of_payment: row.mode_of_payment.trim().to_string(),
            amount: Money::from_major(row.amount),
            account: row.account,
            folio_window: row.folio_window,
        });
    }
    Ok(out)
}

// =============================================================================
// Item Bulk Upsert
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct BulkItemsRequest {
    pub items: Vec<BulkItemInput>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItemInput {
    /// Existing row id; present when the terminal edits a line.
    pub name: Option<String>,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub uom: Option<String>,
    pub qty: Option<f64>,
    pub rate: Option<f64>,
    pub amount: Option<f64>,
    pub folio_window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkItemsResponse {
    pub ok: bool,
    pub invoice_id: String,
    pub count: usize,
    pub total_amount: f64,
    pub total_qty: f64,
    pub items: Vec<InvoiceItemDto>,
}

/// `POST /api/pos/invoice/:id/items` - transactional bulk upsert of
/// invoice item rows.
pub async fn bulk_upsert_items(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Json(req): Json<BulkItemsRequest>,
) -> Result<Json<BulkItemsResponse>, ApiError> {
    if req.items.is_empty() {
        return Err(CoreError::NoItemsProvided.into());
    }

    let mut rows = Vec::with_capacity(req.items.len());
    for (i, item) in req.items.into_iter().enumerate() {
        rows.push(validate_bulk_item(i, item)?);
    }

    let upserted = state.db.invoices().bulk_upsert_items(&invoice_id, rows).await?;

    let total_amount: Money = upserted.iter().map(InvoiceItem::amount).sum();
    let total_qty: f64 = upserted.iter().map(|i| i.qty).sum();

    info!(
        invoice = %invoice_id,
        count = upserted.len(),
        total = %total_amount,
        "Invoice items bulk upserted"
    );

    Ok(Json(BulkItemsResponse {
        ok: true,
        invoice_id,
        count: upserted.len(),
        total_amount: total_amount.to_major(),
        total_qty,
        items: upserted.into_iter().map(InvoiceItemDto::from).collect(),
    }))
}

/// Validates one bulk row and applies the best-effort defaults:
/// item_name ← item_code, description ← item_name, uom ← "Unit",
/// amount ← rate × qty.
fn validate_bulk_item(index: usize, item: BulkItemInput) -> Result<ItemUpsertRow, ApiError> {
    let item_code = item
        .item_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            ApiError::validation(format!("Item {}: item_code is required", index + 1))
        })?
        .to_string();

    let qty = item
        .qty
        .ok_or_else(|| ApiError::validation(format!("Item {}: qty is required", index + 1)))?;
    validate_qty(qty)?;

    let rate_major = item.rate.unwrap_or(0.0);
    validate_amount("rate", rate_major)?;
    let rate = Money::from_major(rate_major);

    let amount = match item.amount {
        Some(a) => {
            validate_amount("amount", a)?;
            Money::from_major(a)
        }
        None => rate.multiply_qty(qty),
    };

    let item_name = item
        .item_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| item_code.clone());
    let description = item
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| item_name.clone());
    let uom = item
        .uom
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UOM.to_string());

    Ok(ItemUpsertRow {
        row_id: item.name.filter(|n| !n.is_empty()),
        item_code,
        item_name,
        description,
        uom,
        qty,
        rate,
        amount,
        folio_window: item.folio_window,
    })
}

// =============================================================================
// Item Void
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct VoidItemRequest {
    pub item_row_id: String,
    pub cause: String,
}

#[derive(Debug, Serialize)]
pub struct VoidItemResponse {
    pub ok: bool,
    pub voided_item: VoidedItemDto,
}

#[derive(Debug, Serialize)]
pub struct VoidedItemDto {
    pub invoice_id: String,
    pub item_code: String,
    pub qty: f64,
    pub cause: String,
}

/// `POST /api/pos/invoice/item/void` - void one invoice item: the row
/// is copied into the void bin and deleted atomically.
pub async fn void_item(
    State(state): State<AppState>,
    Extension(CurrentCashier(cashier)): Extension<CurrentCashier>,
    Json(req): Json<VoidItemRequest>,
) -> Result<Json<VoidItemResponse>, ApiError> {
    let item_row_id = validate_required("item_row_id", &req.item_row_id)?;
    let cause = validate_required("cause", &req.cause)?;

    let voided = state
        .db
        .invoices()
        .void_item(&item_row_id, &cause, &cashier.id)
        .await?;

    info!(
        invoice = %voided.invoice_id,
        item = %voided.item_code,
        cashier = %cashier.cashier_code,
        "Invoice item voided"
    );

    Ok(Json(VoidItemResponse {
        ok: true,
        voided_item: VoidedItemDto {
            invoice_id: voided.invoice_id,
            item_code: voided.item_code,
            qty: voided.qty,
            cause: voided.cause,
        },
    }))
}
