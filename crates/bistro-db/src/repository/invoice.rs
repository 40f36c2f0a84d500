//! # Invoice Repository
//!
//! Invoices, their item and payment rows, and the void bin.
//!
//! ## Write Paths
//! ```text
//! create_invoice / update_invoice
//!   └── header upsert + optional payments replacement + totals, one tx
//!
//! bulk_upsert_items
//!   └── N item rows inserted or updated + totals, one tx
//!       (the stored-procedure contract of the original system)
//!
//! void_item
//!   └── void-bin copy + row delete + totals, one tx
//! ```
//!
//! Invariant maintained by every write: `grand_total_cents` is the sum of
//! item amounts and `paid_amount_cents` the sum of payment amounts.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bistro_core::{
    Invoice, InvoiceDocument, InvoiceItem, InvoicePayment, InvoiceStatus, Money, VoidedItem,
};

// =============================================================================
// Write Inputs
// =============================================================================

/// Header fields of an invoice upsert. `None` leaves the stored value
/// untouched on update; on create, `None` means "not provided".
#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub customer: Option<String>,
    pub pos_session_id: Option<String>,
    pub table_number: Option<String>,
    pub room_number: Option<String>,
    pub number_of_guests: Option<i64>,
}

/// A replacement payment row. The payments list of an upsert replaces all
/// stored payment rows.
#[derive(Debug, Clone)]
pub struct NewPaymentRow {
    pub mode_of_payment: String,
    pub amount: Money,
    pub account: Option<String>,
    pub folio_window: Option<String>,
}

/// One row of a bulk item upsert, already validated and defaulted.
#[derive(Debug, Clone)]
pub struct ItemUpsertRow {
    /// Existing row id to update; `None` inserts a new row.
    pub row_id: Option<String>,
    pub item_code: String,
    pub item_name: String,
    pub description: String,
    pub uom: String,
    pub qty: f64,
    pub rate: Money,
    pub amount: Money,
    pub folio_window: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Gets an invoice header by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer, pos_session_id, table_number, room_number,
                   number_of_guests, status, grand_total_cents,
                   paid_amount_cents, posting_date, created_at, updated_at
            FROM pos_invoices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Loads the full document: header, items, payments.
    pub async fn load_document(&self, id: &str) -> DbResult<Option<InvoiceDocument>> {
        let Some(invoice) = self.get(id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT id, invoice_id, item_code, item_name, description, uom,
                   qty, rate_cents, amount_cents, folio_window, created_at
            FROM pos_invoice_items
            WHERE invoice_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let payments = sqlx::query_as::<_, InvoicePayment>(
            r#"
            SELECT id, invoice_id, mode_of_payment, amount_cents, account,
                   folio_window, created_at
            FROM pos_invoice_payments
            WHERE invoice_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(InvoiceDocument {
            invoice,
            items,
            payments,
        }))
    }

    /// Invoices attached to a session, newest first.
    pub async fn list_for_session(&self, session_id: &str) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer, pos_session_id, table_number, room_number,
                   number_of_guests, status, grand_total_cents,
                   paid_amount_cents, posting_date, created_at, updated_at
            FROM pos_invoices
            WHERE pos_session_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Creates an invoice with a client-supplied id.
    ///
    /// `customer` is mandatory here; the caller rejects creation without
    /// one before reaching the repository.
    pub async fn create_invoice(
        &self,
        id: &str,
        customer: &str,
        patch: InvoicePatch,
        payments: Option<Vec<NewPaymentRow>>,
    ) -> DbResult<InvoiceDocument> {
        let now = Utc::now();

        debug!(invoice = %id, %customer, "Creating POS invoice");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO pos_invoices (
                id, customer, pos_session_id, table_number, room_number,
                number_of_guests, status, grand_total_cents,
                paid_amount_cents, posting_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(customer)
        .bind(&patch.pos_session_id)
        .bind(&patch.table_number)
        .bind(&patch.room_number)
        .bind(patch.number_of_guests)
        .bind(InvoiceStatus::Draft)
        .bind(now.date_naive())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if let Some(rows) = payments {
            replace_payments(&mut tx, id, &rows).await?;
        }

        recompute_totals(&mut tx, id).await?;
        tx.commit().await?;

        self.load_document(id)
            .await?
            .ok_or_else(|| DbError::not_found("POS Invoice", id))
    }

    /// Updates an existing invoice. Provided header fields overwrite the
    /// stored values; a provided payments list replaces all payment rows.
    pub async fn update_invoice(
        &self,
        id: &str,
        patch: InvoicePatch,
        payments: Option<Vec<NewPaymentRow>>,
    ) -> DbResult<InvoiceDocument> {
        let current = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("POS Invoice", id))?;

        let now = Utc::now();

        debug!(invoice = %id, "Updating POS invoice");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE pos_invoices
            SET customer = ?, pos_session_id = ?, table_number = ?,
                room_number = ?, number_of_guests = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.customer.as_deref().unwrap_or(&current.customer))
        .bind(patch.pos_session_id.or(current.pos_session_id))
        .bind(patch.table_number.or(current.table_number))
        .bind(patch.room_number.or(current.room_number))
        .bind(patch.number_of_guests.or(current.number_of_guests))
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(rows) = payments {
            replace_payments(&mut tx, id, &rows).await?;
        }

        recompute_totals(&mut tx, id).await?;
        tx.commit().await?;

        self.load_document(id)
            .await?
            .ok_or_else(|| DbError::not_found("POS Invoice", id))
    }

    /// Bulk-upserts item rows for an invoice in a single transaction.
    ///
    /// Rows carrying a known `row_id` are updated in place, the rest are
    /// inserted. Returns the affected rows in input order.
    pub async fn bulk_upsert_items(
        &self,
        invoice_id: &str,
        rows: Vec<ItemUpsertRow>,
    ) -> DbResult<Vec<InvoiceItem>> {
        // The invoice must exist; FK enforcement alone would report a
        // bare constraint error instead of which document is missing.
        self.get(invoice_id)
            .await?
            .ok_or_else(|| DbError::not_found("POS Invoice", invoice_id))?;

        debug!(invoice = %invoice_id, count = rows.len(), "Bulk upserting invoice items");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut upserted = Vec::with_capacity(rows.len());

        for row in rows {
            let existing_id = match row.row_id.as_deref() {
                Some(rid) if !rid.is_empty() => {
                    sqlx::query_scalar::<_, String>(
                        "SELECT id FROM pos_invoice_items WHERE id = ? AND invoice_id = ?",
                    )
                    .bind(rid)
                    .bind(invoice_id)
                    .fetch_optional(&mut *tx)
                    .await?
                }
                _ => None,
            };

            let item = match existing_id {
                Some(rid) => {
                    sqlx::query(
                        r#"
                        UPDATE pos_invoice_items
                        SET item_code = ?, item_name = ?, description = ?, uom = ?,
                            qty = ?, rate_cents = ?, amount_cents = ?, folio_window = ?
                        WHERE id = ?
                        "#,
                    )
                    .bind(&row.item_code)
                    .bind(&row.item_name)
                    .bind(&row.description)
                    .bind(&row.uom)
                    .bind(row.qty)
                    .bind(row.rate.cents())
                    .bind(row.amount.cents())
                    .bind(&row.folio_window)
                    .bind(&rid)
                    .execute(&mut *tx)
                    .await?;

                    sqlx::query_as::<_, InvoiceItem>(
                        r#"
                        SELECT id, invoice_id, item_code, item_name, description, uom,
                               qty, rate_cents, amount_cents, folio_window, created_at
                        FROM pos_invoice_items
                        WHERE id = ?
                        "#,
                    )
                    .bind(&rid)
                    .fetch_one(&mut *tx)
                    .await?
                }
                None => {
                    let item = InvoiceItem {
                        id: Uuid::new_v4().to_string(),
                        invoice_id: invoice_id.to_string(),
                        item_code: row.item_code,
                        item_name: row.item_name,
                        description: row.description,
                        uom: row.uom,
                        qty: row.qty,
                        rate_cents: row.rate.cents(),
                        amount_cents: row.amount.cents(),
                        folio_window: row.folio_window,
                        created_at: now,
                    };

                    sqlx::query(
                        r#"
                        INSERT INTO pos_invoice_items (
                            id, invoice_id, item_code, item_name, description,
                            uom, qty, rate_cents, amount_cents, folio_window,
                            created_at
                        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                        "#,
                    )
                    .bind(&item.id)
                    .bind(&item.invoice_id)
                    .bind(&item.item_code)
                    .bind(&item.item_name)
                    .bind(&item.description)
                    .bind(&item.uom)
                    .bind(item.qty)
                    .bind(item.rate_cents)
                    .bind(item.amount_cents)
                    .bind(&item.folio_window)
                    .bind(item.created_at)
                    .execute(&mut *tx)
                    .await?;

                    item
                }
            };

            upserted.push(item);
        }

        recompute_totals(&mut tx, invoice_id).await?;
        tx.commit().await?;

        Ok(upserted)
    }

    /// Voids one invoice item: copies it into the void bin and deletes
    /// the row, atomically.
    pub async fn void_item(
        &self,
        item_row_id: &str,
        cause: &str,
        created_by: &str,
    ) -> DbResult<VoidedItem> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT id, invoice_id, item_code, item_name, description, uom,
                   qty, rate_cents, amount_cents, folio_window, created_at
            FROM pos_invoice_items
            WHERE id = ?
            "#,
        )
        .bind(item_row_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("POS Invoice Item", item_row_id))?;

        let voided = VoidedItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: row.invoice_id.clone(),
            item_code: row.item_code.clone(),
            qty: row.qty,
            cause: cause.to_string(),
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        };

        debug!(invoice = %voided.invoice_id, item = %voided.item_code, "Voiding invoice item");

        sqlx::query(
            r#"
            INSERT INTO pos_invoice_void_bin (
                id, invoice_id, item_code, qty, cause, created_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&voided.id)
        .bind(&voided.invoice_id)
        .bind(&voided.item_code)
        .bind(voided.qty)
        .bind(&voided.cause)
        .bind(&voided.created_by)
        .bind(voided.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM pos_invoice_items WHERE id = ?")
            .bind(item_row_id)
            .execute(&mut *tx)
            .await?;

        recompute_totals(&mut tx, &voided.invoice_id).await?;
        tx.commit().await?;

        Ok(voided)
    }

    /// Void-bin entries for an invoice, for audit screens.
    pub async fn void_bin_for_invoice(&self, invoice_id: &str) -> DbResult<Vec<VoidedItem>> {
        let entries = sqlx::query_as::<_, VoidedItem>(
            r#"
            SELECT id, invoice_id, item_code, qty, cause, created_by, created_at
            FROM pos_invoice_void_bin
            WHERE invoice_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Replaces all payment rows of an invoice inside an open transaction.
async fn replace_payments(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: &str,
    rows: &[NewPaymentRow],
) -> DbResult<()> {
    sqlx::query("DELETE FROM pos_invoice_payments WHERE invoice_id = ?")
        .bind(invoice_id)
        .execute(&mut **tx)
        .await?;

    let now = Utc::now();
    for row in rows {
        sqlx::query(
            r#"
            INSERT INTO pos_invoice_payments (
                id, invoice_id, mode_of_payment, amount_cents, account,
                folio_window, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(invoice_id)
        .bind(&row.mode_of_payment)
        .bind(row.amount.cents())
        .bind(&row.account)
        .bind(&row.folio_window)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Recomputes invoice totals from its child rows inside an open
/// transaction. Keeps the totals invariant across every write path.
async fn recompute_totals(tx: &mut Transaction<'_, Sqlite>, invoice_id: &str) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE pos_invoices
        SET grand_total_cents = COALESCE(
                (SELECT SUM(amount_cents) FROM pos_invoice_items WHERE invoice_id = ?), 0),
            paid_amount_cents = COALESCE(
                (SELECT SUM(amount_cents) FROM pos_invoice_payments WHERE invoice_id = ?), 0),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(invoice_id)
    .bind(invoice_id)
    .bind(Utc::now())
    .bind(invoice_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
