//! # Catalog Repository
//!
//! POS profiles, item groups, items, and the flat row set consumed by
//! `bistro_core::catalog::build_catalog_forest`.
//!
//! ## Retrieval Shape
//! ```text
//! profile ──► root group ids ──► recursive CTE over item_groups
//!                                      │
//!                                      ▼
//!               flat rows (group × item, LEFT JOIN, disabled filtered)
//!                                      │
//!                                      ▼
//!                  core::catalog::build_catalog_forest → nested tree
//! ```

use sqlx::SqlitePool;

use crate::error::DbResult;
use bistro_core::{CatalogRow, Item, ItemGroup, PosProfile};

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// Gets an active (non-disabled) POS profile by id.
    pub async fn get_active_profile(&self, id: &str) -> DbResult<Option<PosProfile>> {
        let profile = sqlx::query_as::<_, PosProfile>(
            r#"
            SELECT id, profile_name, disabled
            FROM pos_profiles
            WHERE id = ? AND disabled = 0
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Root item-group ids exposed by a profile, in link order.
    pub async fn profile_root_groups(&self, profile_id: &str) -> DbResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT group_id
            FROM pos_profile_item_groups
            WHERE profile_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    // =========================================================================
    // Catalog Rows
    // =========================================================================

    /// Flat catalog rows for the given root groups and every descendant
    /// group, each LEFT JOINed to its enabled items.
    ///
    /// The recursive CTE walks `parent_group_id` downward; `UNION`
    /// deduplication terminates the walk even on cyclic data. Ordering is
    /// group name then item name so the assembled tree is stable.
    pub async fn catalog_rows(&self, root_ids: &[String]) -> DbResult<Vec<CatalogRow>> {
        if root_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; root_ids.len()].join(", ");
        let sql = format!(
            r#"
            WITH RECURSIVE catalog_groups(id) AS (
                SELECT id FROM item_groups WHERE id IN ({placeholders})
                UNION
                SELECT g.id
                FROM item_groups g
                JOIN catalog_groups cg ON g.parent_group_id = cg.id
            )
            SELECT
                g.id               AS group_id,
                g.group_name       AS group_name,
                g.parent_group_id  AS parent_group_id,
                g.is_group         AS is_group,
                i.id               AS item_code,
                i.item_name        AS item_name,
                i.description      AS description,
                i.uom              AS uom,
                i.rate_cents       AS rate_cents,
                i.disabled         AS item_disabled
            FROM catalog_groups cg
            JOIN item_groups g ON g.id = cg.id
            LEFT JOIN items i ON i.group_id = g.id AND i.disabled = 0
            ORDER BY g.group_name, i.item_name
            "#
        );

        let mut query = sqlx::query_as::<_, CatalogRow>(&sql);
        for id in root_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    // =========================================================================
    // Seed / Test Writers
    // =========================================================================

    /// Inserts an item group.
    pub async fn insert_group(&self, group: &ItemGroup) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO item_groups (id, group_name, parent_group_id, is_group)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&group.id)
        .bind(&group.group_name)
        .bind(&group.parent_group_id)
        .bind(group.is_group)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts an item.
    pub async fn insert_item(&self, item: &Item) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO items (id, item_name, description, uom, rate_cents, group_id, disabled)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.item_name)
        .bind(&item.description)
        .bind(&item.uom)
        .bind(item.rate_cents)
        .bind(&item.group_id)
        .bind(item.disabled)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a POS profile.
    pub async fn insert_profile(&self, profile: &PosProfile) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pos_profiles (id, profile_name, disabled)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.profile_name)
        .bind(profile.disabled)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Links a root item group to a profile.
    pub async fn link_profile_group(&self, profile_id: &str, group_id: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pos_profile_item_groups (profile_id, group_id)
            VALUES (?, ?)
            "#,
        )
        .bind(profile_id)
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
