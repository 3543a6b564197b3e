//! FILENAME: core/report-engine/src/arena.rs
//! Node Arena - the flattened, index-linked form of the report tree.
//!
//! All nodes live in one contiguous vector in pre-order. Each row knows its
//! own position and its parent's position, and the arena keeps the child
//! lists, so no pointer graph is ever built and traversal order is simply
//! index order.

use std::collections::BTreeMap;

use engine::CellValue;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::HierarchyKeys;
use crate::definition::Level;
use crate::response::Node;

/// Position of a row inside the arena (its pre-order index).
pub type RowId = usize;

/// Child list; groups rarely hold more than a handful of direct children
/// per enterprise, items are usually under a few dozen per group.
pub type ChildIds = SmallVec<[RowId; 8]>;

// ============================================================================
// FLAT ROW
// ============================================================================

/// One node after flattening, with inherited dimension fields filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub id: RowId,
    pub parent: Option<RowId>,
    pub level: Level,
    pub fields: BTreeMap<String, CellValue>,
}

impl FlatRow {
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    /// Display text of a field; empty for null or missing fields.
    pub fn text(&self, key: &str) -> String {
        self.fields
            .get(key)
            .map(CellValue::display_value)
            .unwrap_or_default()
    }

    /// Lenient numeric value of a field; 0 for null, missing or non-numeric.
    pub fn number(&self, key: &str) -> f64 {
        self.fields
            .get(key)
            .and_then(CellValue::to_number)
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, key: &str, value: CellValue) {
        self.fields.insert(key.to_string(), value);
    }

    /// Blanks a field for display. The key stays present so the table
    /// renders an empty cell, not the missing-column placeholder.
    pub fn blank(&mut self, key: &str) {
        self.set(key, CellValue::Empty);
    }

    pub fn enterprise(&self, keys: &HierarchyKeys) -> String {
        self.text(&keys.enterprise)
    }

    pub fn group(&self, keys: &HierarchyKeys) -> String {
        self.text(&keys.group)
    }

    /// Space-joined display text of every non-null field plus the level
    /// number, used by the global search.
    pub fn search_text(&self) -> String {
        self.fields
            .values()
            .filter(|value| !value.is_empty())
            .map(CellValue::display_value)
            .chain(std::iter::once(self.level.depth().to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// ARENA
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    rows: Vec<FlatRow>,
    children: Vec<ChildIds>,
}

impl NodeArena {
    /// Flattens `tree` in pre-order, depth first, children in given order.
    pub fn from_tree(tree: &[Node], keys: &HierarchyKeys) -> Self {
        let mut arena = NodeArena::default();
        for node in tree {
            arena.push_subtree(node, None, None, None, keys);
        }
        engine::log_debug!("ARENA", "flattened roots={} rows={}", tree.len(), arena.len());
        arena
    }

    fn push_subtree(
        &mut self,
        node: &Node,
        parent: Option<RowId>,
        inherited_enterprise: Option<&CellValue>,
        parent_group: Option<&CellValue>,
        keys: &HierarchyKeys,
    ) {
        let id = self.rows.len();
        let mut fields = node.fields.clone();

        inherit(&mut fields, &keys.enterprise, inherited_enterprise);
        inherit(&mut fields, &keys.group, parent_group);

        let enterprise = fields.get(&keys.enterprise).filter(|v| !v.is_empty()).cloned();
        let group = fields.get(&keys.group).filter(|v| !v.is_empty()).cloned();

        self.rows.push(FlatRow {
            id,
            parent,
            level: node.level,
            fields,
        });
        self.children.push(ChildIds::new());
        if let Some(parent_id) = parent {
            self.children[parent_id].push(id);
        }

        for child in &node.items {
            self.push_subtree(child, Some(id), enterprise.as_ref(), group.as_ref(), keys);
        }
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FlatRow> {
        self.rows
    }

    pub fn get(&self, id: RowId) -> Option<&FlatRow> {
        self.rows.get(id)
    }

    pub fn parent(&self, id: RowId) -> Option<RowId> {
        self.rows.get(id).and_then(|row| row.parent)
    }

    pub fn children(&self, id: RowId) -> &[RowId] {
        self.children.get(id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> impl Iterator<Item = &FlatRow> + '_ {
        self.rows.iter().filter(|row| row.parent.is_none())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Copies `value` into `key` unless the record already has a non-null value.
fn inherit(fields: &mut BTreeMap<String, CellValue>, key: &str, value: Option<&CellValue>) {
    let Some(value) = value else {
        return;
    };
    let has_own = fields.get(key).is_some_and(|own| !own.is_empty());
    if !has_own {
        fields.insert(key.to_string(), value.clone());
    }
}

/// Flattens a node tree into pre-order rows.
pub fn flatten(tree: &[Node], keys: &HierarchyKeys) -> Vec<FlatRow> {
    NodeArena::from_tree(tree, keys).into_rows()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> HierarchyKeys {
        HierarchyKeys::default()
    }

    fn sample_tree() -> Vec<Node> {
        vec![
            Node::new(Level::Enterprise)
                .with("Предприятие", "Точка А")
                .with_items(vec![
                    Node::new(Level::Group)
                        .with("Группа", "Напитки")
                        .with("Значение", 15.0)
                        .with_items(vec![
                            Node::new(Level::Item).with("Описание", "Кола").with("Значение", 10.0),
                            Node::new(Level::Item).with("Описание", "Сок").with("Значение", 5.0),
                        ]),
                    Node::new(Level::Group).with("Группа", "Пицца"),
                ]),
            Node::new(Level::Enterprise).with("Предприятие", "Точка Б"),
        ]
    }

    #[test]
    fn test_preorder_and_parent_links() {
        let arena = NodeArena::from_tree(&sample_tree(), &keys());
        assert_eq!(arena.len(), 6);

        let levels: Vec<u8> = arena.rows().iter().map(|r| r.level.depth()).collect();
        assert_eq!(levels, vec![0, 1, 2, 2, 1, 0]);

        assert_eq!(arena.parent(0), None);
        assert_eq!(arena.parent(2), Some(1));
        assert_eq!(arena.parent(4), Some(0));
        assert_eq!(arena.children(0), &[1, 4]);
        assert_eq!(arena.children(1), &[2, 3]);
        assert!(arena.children(5).is_empty());
        assert!(arena.children(99).is_empty());
        assert_eq!(arena.roots().count(), 2);

        for (index, row) in arena.rows().iter().enumerate() {
            assert_eq!(row.id, index);
        }
    }

    #[test]
    fn test_inherits_enterprise_and_group() {
        let rows = flatten(&sample_tree(), &keys());
        assert_eq!(rows[1].enterprise(&keys()), "Точка А");
        assert_eq!(rows[2].enterprise(&keys()), "Точка А");
        assert_eq!(rows[2].group(&keys()), "Напитки");
        assert_eq!(rows[3].group(&keys()), "Напитки");
        assert_eq!(rows[4].group(&keys()), "Пицца");
        // Enterprise rows have no group to inherit.
        assert!(rows[0].get("Группа").is_none());
    }

    #[test]
    fn test_own_values_win_over_inherited() {
        let tree = vec![Node::new(Level::Enterprise)
            .with("Предприятие", "Точка А")
            .with_items(vec![Node::new(Level::Group)
                .with("Предприятие", "Точка А (кухня)")
                .with("Группа", "Горячее")
                .with_items(vec![Node::new(Level::Item).with("Группа", "Супы")])])];
        let rows = flatten(&tree, &keys());
        assert_eq!(rows[1].enterprise(&keys()), "Точка А (кухня)");
        assert_eq!(rows[2].enterprise(&keys()), "Точка А (кухня)");
        assert_eq!(rows[2].group(&keys()), "Супы");
    }

    #[test]
    fn test_null_field_counts_as_omitted() {
        let tree = vec![Node::new(Level::Group)
            .with("Группа", "Напитки")
            .with_items(vec![Node::new(Level::Item).with("Группа", CellValue::Empty)])];
        let rows = flatten(&tree, &keys());
        assert_eq!(rows[1].group(&keys()), "Напитки");
    }

    #[test]
    fn test_empty_tree() {
        let arena = NodeArena::from_tree(&[], &keys());
        assert!(arena.is_empty());
        assert!(flatten(&[], &keys()).is_empty());
    }

    #[test]
    fn test_search_text_skips_nulls() {
        let row = FlatRow {
            id: 0,
            parent: None,
            level: Level::Item,
            fields: BTreeMap::from([
                ("a".to_string(), CellValue::text("Кола")),
                ("b".to_string(), CellValue::Empty),
                ("c".to_string(), CellValue::Number(10.0)),
            ]),
        };
        assert_eq!(row.search_text(), "Кола 10 2");
        assert_eq!(row.number("c"), 10.0);
        assert_eq!(row.number("b"), 0.0);
        assert_eq!(row.number("zzz"), 0.0);
    }
}
