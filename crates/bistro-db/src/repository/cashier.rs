//! # Cashier Repository
//!
//! Cashier accounts and the API credentials issued at login.
//!
//! ## Credential Lifecycle
//! ```text
//! login   → verify password → rotate_credentials(key, secret-hash)
//! request → find_by_api_key(key) → verify_secret(secret, hash)
//! logout  → clear_credentials
//! ```
//!
//! Secrets and passwords are stored as argon2 hashes; the plaintext
//! secret exists only in the login response.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bistro_core::Cashier;

/// Repository for cashier database operations.
#[derive(Debug, Clone)]
pub struct CashierRepository {
    pool: SqlitePool,
}

impl CashierRepository {
    /// Creates a new CashierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashierRepository { pool }
    }

    /// Inserts a cashier row (seed and tests).
    pub async fn insert(&self, cashier: &Cashier) -> DbResult<()> {
        debug!(id = %cashier.id, code = %cashier.cashier_code, "Inserting cashier");

        sqlx::query(
            r#"
            INSERT INTO cashiers (
                id, cashier_code, password_hash, full_name, email, enabled,
                api_key, api_secret_hash, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&cashier.id)
        .bind(&cashier.cashier_code)
        .bind(&cashier.password_hash)
        .bind(&cashier.full_name)
        .bind(&cashier.email)
        .bind(cashier.enabled)
        .bind(&cashier.api_key)
        .bind(&cashier.api_secret_hash)
        .bind(cashier.created_at)
        .bind(cashier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds an enabled cashier by terminal code.
    pub async fn find_enabled_by_code(&self, code: &str) -> DbResult<Option<Cashier>> {
        let cashier = sqlx::query_as::<_, Cashier>(
            r#"
            SELECT id, cashier_code, password_hash, full_name, email, enabled,
                   api_key, api_secret_hash, created_at, updated_at
            FROM cashiers
            WHERE cashier_code = ? AND enabled = 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cashier)
    }

    /// Finds an enabled cashier holding the given API key.
    pub async fn find_by_api_key(&self, api_key: &str) -> DbResult<Option<Cashier>> {
        let cashier = sqlx::query_as::<_, Cashier>(
            r#"
            SELECT id, cashier_code, password_hash, full_name, email, enabled,
                   api_key, api_secret_hash, created_at, updated_at
            FROM cashiers
            WHERE api_key = ? AND enabled = 1
            "#,
        )
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cashier)
    }

    /// Gets a cashier by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Cashier>> {
        let cashier = sqlx::query_as::<_, Cashier>(
            r#"
            SELECT id, cashier_code, password_hash, full_name, email, enabled,
                   api_key, api_secret_hash, created_at, updated_at
            FROM cashiers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cashier)
    }

    /// Stores a fresh API key / secret-hash pair for a cashier.
    /// Invalidates any previously issued token.
    pub async fn rotate_credentials(
        &self,
        cashier_id: &str,
        api_key: &str,
        api_secret_hash: &str,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cashiers
            SET api_key = ?, api_secret_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(api_key)
        .bind(api_secret_hash)
        .bind(now)
        .bind(cashier_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cashier", cashier_id));
        }

        Ok(())
    }

    /// Clears stored API credentials (logout).
    pub async fn clear_credentials(&self, cashier_id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cashiers
            SET api_key = NULL, api_secret_hash = NULL, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(cashier_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cashier", cashier_id));
        }

        Ok(())
    }
}

// =============================================================================
// Credential Hashing Helpers
// =============================================================================

/// Hashes a password or API secret for storage.
pub fn hash_secret(secret: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password or API secret against its stored hash.
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
