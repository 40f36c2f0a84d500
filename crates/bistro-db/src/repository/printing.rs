//! # Printing Repository
//!
//! Printer routing maps per cashier device: which preparation printer
//! (and backup) serves each print class on a given terminal.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbResult;
use bistro_core::{CashierDevicePrintersMap, DevicePrinterRow, PrintClass};

/// Repository for device printer maps.
#[derive(Debug, Clone)]
pub struct PrintingRepository {
    pool: SqlitePool,
}

impl PrintingRepository {
    /// Creates a new PrintingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PrintingRepository { pool }
    }

    /// Printer maps, optionally filtered to one device, grouped per
    /// device and ordered by device id.
    pub async fn printers_map(
        &self,
        device_id: Option<&str>,
    ) -> DbResult<Vec<CashierDevicePrintersMap>> {
        let rows = sqlx::query_as::<_, DevicePrinterRow>(
            r#"
            SELECT device_id, print_class, preparation_printer,
                   connection_info, backup_printer, backup_connection_info
            FROM cashier_device_printers
            WHERE device_id = IFNULL(?, device_id)
            ORDER BY device_id, print_class
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_rows(rows))
    }

    /// Registers a printer route for a device (seed and tests).
    pub async fn insert_route(&self, row: &DevicePrinterRow) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cashier_device_printers (
                id, device_id, print_class, preparation_printer,
                connection_info, backup_printer, backup_connection_info
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&row.device_id)
        .bind(&row.print_class)
        .bind(&row.preparation_printer)
        .bind(&row.connection_info)
        .bind(&row.backup_printer)
        .bind(&row.backup_connection_info)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Folds ordered (device, print class) rows into one map per device.
fn group_rows(rows: Vec<DevicePrinterRow>) -> Vec<CashierDevicePrintersMap> {
    let mut maps: Vec<CashierDevicePrintersMap> = Vec::new();

    for row in rows {
        let class = PrintClass {
            preparation_printer: row.preparation_printer,
            connection_info: row.connection_info,
            backup_printer: row.backup_printer,
            backup_connection_info: row.backup_connection_info,
        };

        match maps.last_mut() {
            Some(map) if map.cashier_device_name == row.device_id => {
                map.print_classes.insert(row.print_class, class);
            }
            _ => {
                let mut map = CashierDevicePrintersMap {
                    cashier_device_name: row.device_id,
                    print_classes: Default::default(),
                };
                map.print_classes.insert(row.print_class, class);
                maps.push(map);
            }
        }
    }

    maps
}

// =============================================================================
// Unit Tests
// =============================================================================
