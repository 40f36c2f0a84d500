//! # Device Repository
//!
//! Registered cashier devices. The device id is the value terminals
//! present in the `X-Device-Id` header.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::DbResult;
use bistro_core::CashierDevice;

/// Repository for cashier-device operations.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: SqlitePool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeviceRepository { pool }
    }

    /// Registers a device (seed and tests).
    pub async fn insert(&self, id: &str, device_name: &str, enabled: bool) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cashier_devices (id, device_name, enabled, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(device_name)
        .bind(enabled)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a device by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<CashierDevice>> {
        let device = sqlx::query_as::<_, CashierDevice>(
            r#"
            SELECT id, device_name, enabled, created_at
            FROM cashier_devices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(device)
    }

    /// Whether a device with this id exists at all.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cashier_devices WHERE id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Whether an ENABLED device with this id exists. The device guard
    /// middleware calls this on every protected request.
    pub async fn exists_enabled(&self, id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cashier_devices WHERE id = ? AND enabled = 1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
