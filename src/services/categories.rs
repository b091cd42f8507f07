// src/services/categories.rs

//! Category hierarchy reconstruction.
//!
//! Turns the flat, parent-referenced category list into a forest and
//! decorates every node with display attributes looked up by name.

use std::collections::HashMap;

use crate::models::{CategoryDisplayEntry, CategoryNode, CategoryRecord, DisplayAttributes};

/// Name → display attributes, with a fallback for unknown names.
#[derive(Debug, Clone)]
pub struct DisplayTable {
    entries: HashMap<String, DisplayAttributes>,
    fallback: DisplayAttributes,
}

impl DisplayTable {
    /// Built-in table for the storefront's standard top-level categories.
    pub fn builtin() -> Self {
        const BUILTIN: &[(&str, &str, &str, bool)] = &[
            ("Electronics", "cpu", "blue", true),
            ("Fashion", "shirt", "pink", true),
            ("Home & Living", "home", "amber", false),
            ("Books", "book", "green", false),
            ("Sports", "dumbbell", "orange", false),
            ("Beauty", "sparkles", "rose", false),
            ("Kids", "toy", "yellow", false),
            ("Automotive", "car", "slate", false),
        ];

        let entries = BUILTIN
            .iter()
            .map(|&(name, icon, color_theme, is_featured)| {
                (
                    name.to_string(),
                    DisplayAttributes {
                        icon: icon.to_string(),
                        color_theme: color_theme.to_string(),
                        is_featured,
                    },
                )
            })
            .collect();

        Self {
            entries,
            fallback: DisplayAttributes::default(),
        }
    }

    /// Add or replace entries, e.g. from configuration.
    pub fn with_overrides(mut self, overrides: &[CategoryDisplayEntry]) -> Self {
        for entry in overrides {
            self.entries.insert(
                entry.name.clone(),
                DisplayAttributes {
                    icon: entry.icon.clone(),
                    color_theme: entry.color_theme.clone(),
                    is_featured: entry.featured,
                },
            );
        }
        self
    }

    pub fn lookup(&self, name: &str) -> DisplayAttributes {
        self.entries
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for DisplayTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builds category forests from flat record lists.
#[derive(Debug, Clone, Default)]
pub struct CategoryReconstructor {
    display: DisplayTable,
}

impl CategoryReconstructor {
    pub fn new(display: DisplayTable) -> Self {
        Self { display }
    }

    /// Build the forest for `records`.
    ///
    /// A record goes under its parent when the parent id is present in the
    /// list, into the top level when it is declared a root, and is dropped
    /// otherwise. Input order is preserved among siblings and roots.
    pub fn build(&self, records: &[CategoryRecord]) -> Vec<CategoryNode> {
        // Pass 1: one node per record, indexed by id. First record wins on duplicate ids.
        let mut nodes: Vec<Option<CategoryNode>> = Vec::with_capacity(records.len());
        let mut index: HashMap<i64, usize> = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let display = self.display.lookup(&record.name);
            nodes.push(Some(CategoryNode::new(record.clone(), display)));
            index.entry(record.id).or_insert(position);
        }

        // Pass 2: link each record to its parent, or to the forest.
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut roots = Vec::new();
        for (position, record) in records.iter().enumerate() {
            match record.parent_id.and_then(|parent| index.get(&parent)) {
                Some(&parent) => children[parent].push(position),
                None if record.is_root => roots.push(position),
                None => log::debug!(
                    "Category {} ({}) excluded: parent {:?} not found",
                    record.id,
                    record.name,
                    record.parent_id
                ),
            }
        }

        // Pass 3: order reachable nodes parents-first, then fill children
        // from the deepest level up so every subtree is complete when moved.
        let mut order = Vec::with_capacity(records.len());
        let mut pending: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(position) = pending.pop() {
            order.push(position);
            pending.extend(children[position].iter().rev().copied());
        }
        for &position in order.iter().rev() {
            let subtree: Vec<CategoryNode> = children[position]
                .iter()
                .filter_map(|&child| nodes[child].take())
                .collect();
            if let Some(node) = nodes[position].as_mut() {
                node.children = subtree;
            }
        }

        let forest: Vec<CategoryNode> = roots
            .into_iter()
            .filter_map(|root| nodes[root].take())
            .collect();

        let reachable = count_nodes(&forest);
        if reachable < records.len() {
            log::debug!(
                "Category forest holds {} of {} records",
                reachable,
                records.len()
            );
        }
        forest
    }
}

/// Top-level ordering for menus: featured first, then by name.
///
/// Returns a reordered copy; subtrees keep their order.
pub fn featured_first(forest: &[CategoryNode]) -> Vec<CategoryNode> {
    let mut ordered = forest.to_vec();
    ordered.sort_by(|a, b| {
        b.is_featured()
            .cmp(&a.is_featured())
            .then_with(|| a.name().cmp(b.name()))
    });
    ordered
}

/// Total number of nodes in the forest.
pub fn count_nodes(forest: &[CategoryNode]) -> usize {
    forest.iter().map(CategoryNode::subtree_size).sum()
}

/// Find a node anywhere in the forest, in depth-first order.
pub fn find(forest: &[CategoryNode], id: i64) -> Option<&CategoryNode> {
    let mut pending: Vec<&CategoryNode> = forest.iter().rev().collect();
    while let Some(node) = pending.pop() {
        if node.id() == id {
            return Some(node);
        }
        pending.extend(node.children.iter().rev());
    }
    None
}

/// Nodes from a root down to `id`, for breadcrumbs.
pub fn path_to(forest: &[CategoryNode], id: i64) -> Option<Vec<&CategoryNode>> {
    let mut path: Vec<&CategoryNode> = Vec::new();
    let mut pending: Vec<(usize, &CategoryNode)> = forest.iter().rev().map(|n| (0, n)).collect();
    while let Some((depth, node)) = pending.pop() {
        path.truncate(depth);
        path.push(node);
        if node.id() == id {
            return Some(path);
        }
        pending.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(forest: &[CategoryNode]) -> Vec<i64> {
        forest.iter().map(CategoryNode::id).collect()
    }

    fn sample() -> Vec<CategoryRecord> {
        vec![
            CategoryRecord::root(1, "Electronics"),
            CategoryRecord::child(2, "Phones", 1, 1),
            CategoryRecord::child(3, "Cameras", 1, 1),
            CategoryRecord::root(4, "Books"),
            CategoryRecord::child(5, "Film Cameras", 3, 2),
        ]
    }

    #[test]
    fn test_builds_nested_forest() {
        let forest = CategoryReconstructor::default().build(&sample());

        assert_eq!(ids(&forest), vec![1, 4]);
        assert_eq!(ids(&forest[0].children), vec![2, 3]);
        assert_eq!(ids(&forest[0].children[1].children), vec![5]);
        assert_eq!(count_nodes(&forest), 5);
    }

    #[test]
    fn test_child_listed_before_parent() {
        let records = vec![
            CategoryRecord::child(2, "Phones", 1, 1),
            CategoryRecord::root(1, "Electronics"),
        ];
        let forest = CategoryReconstructor::default().build(&records);
        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![2]);
    }

    #[test]
    fn test_orphan_excluded() {
        let records = vec![
            CategoryRecord::root(1, ""),
            CategoryRecord::child(2, "", 1, 1),
            CategoryRecord::child(3, "", 99, 1),
        ];
        let forest = CategoryReconstructor::default().build(&records);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![2]);
        assert!(forest[0].children[0].children.is_empty());
        assert_eq!(find(&forest, 3), None);
    }

    #[test]
    fn test_orphan_subtree_excluded() {
        let mut records = sample();
        records.push(CategoryRecord::child(6, "Lost", 77, 1));
        records.push(CategoryRecord::child(7, "Lost Child", 6, 2));

        let forest = CategoryReconstructor::default().build(&records);
        assert_eq!(count_nodes(&forest), 5);
    }

    #[test]
    fn test_root_with_resolvable_parent_is_nested() {
        let mut records = sample();
        records.push(CategoryRecord {
            parent_id: Some(4),
            ..CategoryRecord::root(6, "Comics")
        });

        let forest = CategoryReconstructor::default().build(&records);
        assert_eq!(ids(&forest), vec![1, 4]);
        assert_eq!(ids(&forest[1].children), vec![6]);
    }

    #[test]
    fn test_cycle_is_unreachable() {
        let records = vec![
            CategoryRecord::root(1, "Root"),
            CategoryRecord::child(2, "A", 3, 1),
            CategoryRecord::child(3, "B", 2, 1),
        ];
        let forest = CategoryReconstructor::default().build(&records);
        assert_eq!(count_nodes(&forest), 1);
    }

    #[test]
    fn test_display_lookup_and_default() {
        let forest = CategoryReconstructor::default().build(&sample());
        assert_eq!(forest[0].display.icon, "cpu");
        assert!(forest[0].is_featured());
        assert_eq!(forest[0].children[0].display, DisplayAttributes::default());
    }

    #[test]
    fn test_display_overrides() {
        let table = DisplayTable::builtin().with_overrides(&[CategoryDisplayEntry {
            name: "Books".to_string(),
            icon: "library".to_string(),
            color_theme: "teal".to_string(),
            featured: true,
        }]);
        let forest = CategoryReconstructor::new(table).build(&sample());
        assert_eq!(forest[1].display.icon, "library");
        assert!(forest[1].is_featured());
    }

    #[test]
    fn test_featured_first_reorders_copy_only() {
        let records = vec![
            CategoryRecord::root(1, "Sports"),
            CategoryRecord::root(2, "Books"),
            CategoryRecord::root(3, "Fashion"),
            CategoryRecord::root(4, "Electronics"),
            CategoryRecord::child(5, "Zebra Prints", 2, 1),
            CategoryRecord::child(6, "Atlases", 2, 1),
        ];
        let forest = CategoryReconstructor::default().build(&records);
        let ordered = featured_first(&forest);

        assert_eq!(ids(&ordered), vec![4, 3, 2, 1]);
        assert_eq!(ids(&forest), vec![1, 2, 3, 4]);
        assert_eq!(ids(&ordered[2].children), vec![5, 6]);
    }

    #[test]
    fn test_path_to() {
        let forest = CategoryReconstructor::default().build(&sample());
        let path: Vec<i64> = path_to(&forest, 5)
            .unwrap()
            .into_iter()
            .map(CategoryNode::id)
            .collect();
        assert_eq!(path, vec![1, 3, 5]);
        assert!(path_to(&forest, 42).is_none());
    }
}
