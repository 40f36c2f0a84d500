//! # Currency Repository
//!
//! Currency listing for the tender screen: the base currency at rate 1.0
//! unioned with every currency that has an exchange rate on file.

use sqlx::SqlitePool;

use crate::error::DbResult;
use bistro_core::CurrencyRate;

/// Repository for currency listing.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    pool: SqlitePool,
}

impl CurrencyRepository {
    /// Creates a new CurrencyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CurrencyRepository { pool }
    }

    /// Lists the base currency (rate 1.0) plus all currencies with an
    /// exchange rate, ordered by code.
    pub async fn list_rates(&self, base_currency: &str) -> DbResult<Vec<CurrencyRate>> {
        let rates = sqlx::query_as::<_, CurrencyRate>(
            r#"
            SELECT ? AS name, 1.0 AS exchange_rate
            UNION
            SELECT DISTINCT c.code AS name, e.exchange_rate
            FROM currencies c
            JOIN currency_exchange e ON e.from_currency = c.code
            ORDER BY name
            "#,
        )
        .bind(base_currency)
        .fetch_all(&self.pool)
        .await?;

        Ok(rates)
    }

    /// Registers a currency with its exchange rate (seed and tests).
    pub async fn insert_rate(&self, code: &str, exchange_rate: f64) -> DbResult<()> {
        sqlx::query("INSERT OR IGNORE INTO currencies (code) VALUES (?)")
            .bind(code)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO currency_exchange (from_currency, exchange_rate)
            VALUES (?, ?)
            ON CONFLICT (from_currency) DO UPDATE SET exchange_rate = excluded.exchange_rate
            "#,
        )
        .bind(code)
        .bind(exchange_rate)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_base_currency_alone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let rates = db.currencies().list_rates("EGP").await.unwrap();

        assert_eq!(
            rates,
            vec![CurrencyRate {
                name: "EGP".to_string(),
                exchange_rate: 1.0
            }]
        );
    }

    #[tokio::test]
    async fn test_exchange_rows_union_with_base() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.currencies();

        repo.insert_rate("USD", 48.5).await.unwrap();
        repo.insert_rate("EUR", 52.1).await.unwrap();
        repo.insert_rate("USD", 49.0).await.unwrap(); // upsert wins

        let rates = repo.list_rates("EGP").await.unwrap();
        let names: Vec<&str> = rates.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["EGP", "EUR", "USD"]);

        let usd = rates.iter().find(|r| r.name == "USD").unwrap();
        assert_eq!(usd.exchange_rate, 49.0);
    }
}
