//! # Session Repository
//!
//! POS sessions and their opening/closing cash entries.
//!
//! ## Session Lifecycle
//! ```text
//! 1. OPEN
//!    └── open_session() → OpeningEntry + PosSession { status: Open }
//!        (both rows in one transaction)
//!
//! 2. WORK
//!    └── invoices reference pos_session_id
//!
//! 3. CLOSE
//!    └── close_session() → ClosingEntry + PosSession { status: Closed }
//!        (both rows in one transaction; only an open session closes)
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bistro_core::{ClosingEntry, Money, OpeningEntry, PosSession, SessionStatus};

/// Repository for POS session operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Gets a session by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<PosSession>> {
        let session = sqlx::query_as::<_, PosSession>(
            r#"
            SELECT id, cashier_id, profile_id, status, opening_entry_id,
                   closing_entry_id, opened_at, closed_at
            FROM pos_sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Most recent open session for a cashier, if any.
    pub async fn find_active(&self, cashier_id: &str) -> DbResult<Option<PosSession>> {
        let session = sqlx::query_as::<_, PosSession>(
            r#"
            SELECT id, cashier_id, profile_id, status, opening_entry_id,
                   closing_entry_id, opened_at, closed_at
            FROM pos_sessions
            WHERE cashier_id = ? AND status = 'open'
            ORDER BY opened_at DESC
            LIMIT 1
            "#,
        )
        .bind(cashier_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Whether the cashier already has an open session on this profile.
    pub async fn has_open_session(&self, cashier_id: &str, profile_id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM pos_sessions
            WHERE cashier_id = ? AND profile_id = ? AND status = 'open'
            "#,
        )
        .bind(cashier_id)
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Opens a session: inserts the opening cash entry and the session
    /// row in one transaction.
    ///
    /// Uniqueness of the open session per (cashier, profile) is checked
    /// by the caller via [`Self::has_open_session`].
    pub async fn open_session(
        &self,
        cashier_id: &str,
        profile_id: &str,
        opening_cash: Money,
        mode_of_payment: &str,
    ) -> DbResult<(PosSession, OpeningEntry)> {
        let now = Utc::now();
        let today = now.date_naive();

        let opening = OpeningEntry {
            id: Uuid::new_v4().to_string(),
            cashier_id: cashier_id.to_string(),
            profile_id: profile_id.to_string(),
            mode_of_payment: mode_of_payment.to_string(),
            amount_cents: opening_cash.cents(),
            posting_date: today,
            created_at: now,
        };

        let session = PosSession {
            id: Uuid::new_v4().to_string(),
            cashier_id: cashier_id.to_string(),
            profile_id: profile_id.to_string(),
            status: SessionStatus::Open,
            opening_entry_id: opening.id.clone(),
            closing_entry_id: None,
            opened_at: now,
            closed_at: None,
        };

        debug!(session = %session.id, profile = %profile_id, "Opening POS session");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO pos_opening_entries (
                id, cashier_id, profile_id, mode_of_payment,
                amount_cents, posting_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&opening.id)
        .bind(&opening.cashier_id)
        .bind(&opening.profile_id)
        .bind(&opening.mode_of_payment)
        .bind(opening.amount_cents)
        .bind(opening.posting_date)
        .bind(opening.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO pos_sessions (
                id, cashier_id, profile_id, status, opening_entry_id,
                closing_entry_id, opened_at, closed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.cashier_id)
        .bind(&session.profile_id)
        .bind(session.status)
        .bind(&session.opening_entry_id)
        .bind(&session.closing_entry_id)
        .bind(session.opened_at)
        .bind(session.closed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((session, opening))
    }

    /// Closes an open session: inserts the closing cash entry, links it,
    /// and flips the status, all in one transaction.
    ///
    /// The UPDATE is guarded on `status = 'open'`; a session closed by a
    /// concurrent request surfaces as NotFound rather than a double close.
    pub async fn close_session(
        &self,
        session_id: &str,
        closing_cash: Money,
    ) -> DbResult<(PosSession, ClosingEntry)> {
        let session = self
            .get(session_id)
            .await?
            .ok_or_else(|| DbError::not_found("POS Session", session_id))?;

        let now = Utc::now();

        let closing = ClosingEntry {
            id: Uuid::new_v4().to_string(),
            opening_entry_id: session.opening_entry_id.clone(),
            cashier_id: session.cashier_id.clone(),
            profile_id: session.profile_id.clone(),
            amount_cents: closing_cash.cents(),
            posting_date: now.date_naive(),
            created_at: now,
        };

        debug!(session = %session_id, "Closing POS session");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO pos_closing_entries (
                id, opening_entry_id, cashier_id, profile_id,
                amount_cents, posting_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&closing.id)
        .bind(&closing.opening_entry_id)
        .bind(&closing.cashier_id)
        .bind(&closing.profile_id)
        .bind(closing.amount_cents)
        .bind(closing.posting_date)
        .bind(closing.created_at)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE pos_sessions
            SET status = 'closed', closing_entry_id = ?, closed_at = ?
            WHERE id = ? AND status = 'open'
            "#,
        )
        .bind(&closing.id)
        .bind(now)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("POS Session (open)", session_id));
        }

        tx.commit().await?;

        let closed = PosSession {
            status: SessionStatus::Closed,
            closing_entry_id: Some(closing.id.clone()),
            closed_at: Some(now),
            ..session
        };

        Ok((closed, closing))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
