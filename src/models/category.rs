// src/models/category.rs

//! Flat category records and the tree nodes built from them.

use serde::{Deserialize, Serialize};

/// A category as listed by the catalog service, parent-referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub depth: u32,

    #[serde(default)]
    pub is_root: bool,

    #[serde(default)]
    pub is_leaf: bool,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CategoryRecord {
    /// Record declared as a root.
    pub fn root(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            depth: 0,
            is_root: true,
            is_leaf: false,
            is_active: true,
        }
    }

    /// Record hanging under `parent_id`.
    pub fn child(id: i64, name: impl Into<String>, parent_id: i64, depth: u32) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(parent_id),
            depth,
            is_root: false,
            is_leaf: true,
            is_active: true,
        }
    }
}

/// Presentation metadata attached to a category node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAttributes {
    pub icon: String,
    pub color_theme: String,
    pub is_featured: bool,
}

impl Default for DisplayAttributes {
    fn default() -> Self {
        Self {
            icon: "tag".to_string(),
            color_theme: "gray".to_string(),
            is_featured: false,
        }
    }
}

/// A category with its children and display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub record: CategoryRecord,

    #[serde(flatten)]
    pub display: DisplayAttributes,

    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(record: CategoryRecord, display: DisplayAttributes) -> Self {
        Self {
            record,
            display,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn is_featured(&self) -> bool {
        self.display.is_featured
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

// Tear down children with an explicit stack; deep chains would otherwise
// recurse once per level.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
