//! # Catalog Forest Assembly
//!
//! Builds the nested item-group/item hierarchy served to POS terminals.
//!
//! ## Input/Output Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Flat rows (one per group × item, item side nullable)               │
//! │                                                                     │
//! │  group_id  parent     item_code                                     │
//! │  ────────  ─────────  ─────────                                     │
//! │  FOOD      (null)     (null)                                        │
//! │  BURGERS   FOOD       BURGER                                        │
//! │  BURGERS   FOOD       CHEESEBURGER                                  │
//! │  DRINKS    (null)     B52                                           │
//! │        │                                                            │
//! │        ▼  build_catalog_forest(rows, roots)                         │
//! │                                                                     │
//! │  FOOD                                                               │
//! │  └── BURGERS ── items: [BURGER, CHEESEBURGER]                       │
//! │  DRINKS ─────── items: [B52]                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Groups nest by `parent_group_id`; each node lists its direct items and
//! recursively nests its child groups. A per-path visited set guards
//! against cyclic parent links in the data: a group already on the current
//! ancestor path is skipped instead of recursed into, so bad data cannot
//! hang the server or overflow the stack. A group reachable from two
//! different parents renders under both.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::CatalogRow;

// =============================================================================
// Output Nodes
// =============================================================================

/// A sellable item as it appears inside a catalog group node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItemNode {
    pub item_code: String,
    pub item_name: String,
    pub description: Option<String>,
    pub uom: String,
    /// Major-unit rate for the wire; storage is integer cents.
    pub rate: f64,
    pub disabled: bool,
}

/// One group node of the catalog forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub item_group_id: String,
    pub item_group_name: String,
    pub is_group: bool,
    pub child_groups: Vec<GroupNode>,
    pub items: Vec<CatalogItemNode>,
}

// =============================================================================
// Forest Construction
// =============================================================================

/// Infers root group ids from a flat row set: groups whose parent is
/// absent, or whose parent does not itself appear as a group in the rows.
/// Order follows first appearance; duplicates collapse.
pub fn root_group_ids(rows: &[CatalogRow]) -> Vec<String> {
    let known: HashSet<&str> = rows.iter().map(|r| r.group_id.as_str()).collect();

    let mut seen = HashSet::new();
    let mut roots = Vec::new();
    for row in rows {
        let is_root = match row.parent_group_id.as_deref() {
            None => true,
            Some(parent) => !known.contains(parent),
        };
        if is_root && seen.insert(row.group_id.clone()) {
            roots.push(row.group_id.clone());
        }
    }
    roots
}

/// Builds the catalog forest for the given root group ids.
///
/// Rows not reachable from `roots` are ignored. Unknown root ids produce
/// no node. Group and item order follows first appearance in `rows`
/// (callers order the SQL result).
pub fn build_catalog_forest(rows: &[CatalogRow], roots: &[String]) -> Vec<GroupNode> {
    let index = RowIndex::new(rows);

    let mut forest = Vec::new();
    let mut path = HashSet::new();
    for root in roots {
        if let Some(node) = index.build_node(root, &mut path) {
            forest.push(node);
        }
    }
    forest
}

/// Pre-indexed view of the flat rows: group metadata, ordered child
/// lists, and ordered per-group item lists.
struct RowIndex<'a> {
    info: HashMap<&'a str, &'a CatalogRow>,
    children: HashMap<&'a str, Vec<&'a str>>,
    items: HashMap<&'a str, Vec<CatalogItemNode>>,
}

impl<'a> RowIndex<'a> {
    fn new(rows: &'a [CatalogRow]) -> Self {
        let mut info: HashMap<&str, &CatalogRow> = HashMap::new();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut items: HashMap<&str, Vec<CatalogItemNode>> = HashMap::new();
        let mut seen_edges: HashSet<(&str, &str)> = HashSet::new();
        let mut seen_items: HashSet<(&str, &str)> = HashSet::new();

        for row in rows {
            info.entry(row.group_id.as_str()).or_insert(row);

            if let Some(parent) = row.parent_group_id.as_deref() {
                if seen_edges.insert((parent, row.group_id.as_str())) {
                    children.entry(parent).or_default().push(row.group_id.as_str());
                }
            }

            // The LEFT JOIN leaves the item side NULL for item-less groups.
            if let Some(code) = row.item_code.as_deref() {
                if seen_items.insert((row.group_id.as_str(), code)) {
                    items
                        .entry(row.group_id.as_str())
                        .or_default()
                        .push(CatalogItemNode {
                            item_code: code.to_string(),
                            item_name: row
                                .item_name
                                .clone()
                                .unwrap_or_else(|| code.to_string()),
                            description: row.description.clone(),
                            uom: row
                                .uom
                                .clone()
                                .unwrap_or_else(|| crate::DEFAULT_UOM.to_string()),
                            rate: Money::from_cents(row.rate_cents.unwrap_or(0)).to_major(),
                            disabled: row.item_disabled.unwrap_or(false),
                        });
                }
            }
        }

        RowIndex {
            info,
            children,
            items,
        }
    }

    /// Builds the node for `group_id`, recursing into children.
    ///
    /// `path` holds the ids of the ancestors currently being built; a
    /// group already on it is a cycle and yields `None`.
    fn build_node(&self, group_id: &str, path: &mut HashSet<String>) -> Option<GroupNode> {
        let row = *self.info.get(group_id)?;

        if !path.insert(group_id.to_string()) {
            return None;
        }

        let mut child_groups = Vec::new();
        if let Some(child_ids) = self.children.get(group_id) {
            for child_id in child_ids {
                if let Some(child) = self.build_node(child_id, path) {
                    child_groups.push(child);
                }
            }
        }

        path.remove(group_id);

        Some(GroupNode {
            item_group_id: row.group_id.clone(),
            item_group_name: row.group_name.clone(),
            is_group: row.is_group,
            child_groups,
            // Items can sit at any level, not just leaves.
            items: self.items.get(group_id).cloned().unwrap_or_default(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn group_row(group_id: &str, parent: Option<&str>, is_group: bool) -> CatalogRow {
        CatalogRow {
            group_id: group_id.to_string(),
            group_name: group_id.to_lowercase(),
            parent_group_id: parent.map(str::to_string),
            is_group,
            item_code: None,
            item_name: None,
            description: None,
            uom: None,
            rate_cents: None,
            item_disabled: None,
        }
    }

    fn item_row(group_id: &str, parent: Option<&str>, code: &str, rate_cents: i64) -> CatalogRow {
        CatalogRow {
            item_code: Some(code.to_string()),
            item_name: Some(code.to_string()),
            description: Some(format!("{code} description")),
            uom: Some("Unit".to_string()),
            rate_cents: Some(rate_cents),
            item_disabled: Some(false),
            ..group_row(group_id, parent, false)
        }
    }

    #[test]
    fn test_empty_rows() {
        assert!(build_catalog_forest(&[], &["FOOD".to_string()]).is_empty());
        assert!(root_group_ids(&[]).is_empty());
    }

    #[test]
    fn test_two_level_nesting_with_items() {
        let rows = vec![
            group_row("FOOD", None, true),
            item_row("BURGERS", Some("FOOD"), "BURGER", 5000),
            item_row("BURGERS", Some("FOOD"), "CHEESEBURGER", 6500),
            item_row("DRINKS", None, "B52", 12000),
        ];

        let forest = build_catalog_forest(&rows, &root_group_ids(&rows));
        assert_eq!(forest.len(), 2);

        let food = &forest[0];
        assert_eq!(food.item_group_id, "FOOD");
        assert!(food.items.is_empty());
        assert_eq!(food.child_groups.len(), 1);

        let burgers = &food.child_groups[0];
        assert_eq!(burgers.item_group_id, "BURGERS");
        assert_eq!(burgers.items.len(), 2);
        assert_eq!(burgers.items[0].item_code, "BURGER");
        assert_eq!(burgers.items[0].rate, 50.0);
        assert_eq!(burgers.items[1].item_code, "CHEESEBURGER");

        let drinks = &forest[1];
        assert_eq!(drinks.item_group_id, "DRINKS");
        assert!(drinks.child_groups.is_empty());
        assert_eq!(drinks.items[0].rate, 120.0);
    }

    #[test]
    fn test_items_attach_to_non_leaf_groups() {
        let rows = vec![
            item_row("FOOD", None, "DAILY-SPECIAL", 3000),
            group_row("FOOD", None, true),
            item_row("SIDES", Some("FOOD"), "FRIES", 1500),
        ];

        let forest = build_catalog_forest(&rows, &["FOOD".to_string()]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].items.len(), 1);
        assert_eq!(forest[0].items[0].item_code, "DAILY-SPECIAL");
        assert_eq!(forest[0].child_groups.len(), 1);
        assert_eq!(forest[0].child_groups[0].items[0].item_code, "FRIES");
    }

    #[test]
    fn test_cycle_does_not_recurse_forever() {
        // A ← B ← A: corrupted parent links.
        let rows = vec![
            group_row("A", Some("B"), true),
            group_row("B", Some("A"), true),
        ];

        let forest = build_catalog_forest(&rows, &["A".to_string()]);
        assert_eq!(forest.len(), 1);
        let a = &forest[0];
        assert_eq!(a.item_group_id, "A");
        assert_eq!(a.child_groups.len(), 1);
        assert_eq!(a.child_groups[0].item_group_id, "B");
        // The cycle edge B → A is dropped.
        assert!(a.child_groups[0].child_groups.is_empty());
    }

    #[test]
    fn test_root_inference_skips_known_parents() {
        let rows = vec![
            group_row("CHILD", Some("ROOT"), false),
            group_row("ROOT", Some("ALL-GROUPS"), true), // parent not in row set
        ];
        assert_eq!(root_group_ids(&rows), vec!["ROOT".to_string()]);
    }

    #[test]
    fn test_unknown_root_produces_no_node() {
        let rows = vec![group_row("FOOD", None, true)];
        assert!(build_catalog_forest(&rows, &["NOPE".to_string()]).is_empty());
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let rows = vec![
            item_row("DRINKS", None, "B52", 12000),
            item_row("DRINKS", None, "B52", 12000),
        ];
        let forest = build_catalog_forest(&rows, &["DRINKS".to_string()]);
        assert_eq!(forest[0].items.len(), 1);
    }

    #[test]
    fn test_group_under_two_parents_renders_twice() {
        let rows = vec![
            group_row("FOOD", None, true),
            group_row("DRINKS", None, true),
            group_row("SPECIALS", Some("FOOD"), false),
            group_row("SPECIALS", Some("DRINKS"), false),
        ];
        let forest = build_catalog_forest(&rows, &root_group_ids(&rows));
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].child_groups[0].item_group_id, "SPECIALS");
        assert_eq!(forest[1].child_groups[0].item_group_id, "SPECIALS");
    }
}
