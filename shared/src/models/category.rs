//! Category model and parent/child tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A product category. Categories form a tree via `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Children index over a loaded category collection, built once per load.
///
/// The tree is the authority for descendant queries: both the parent
/// dropdown population and the cycle check on reparenting go through it.
#[derive(Debug)]
pub struct CategoryTree<'a> {
    categories: &'a [Category],
    children: HashMap<i64, Vec<i64>>,
}

impl<'a> CategoryTree<'a> {
    pub fn build(categories: &'a [Category]) -> Self {
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for category in categories {
            if let Some(parent_id) = category.parent_id {
                children.entry(parent_id).or_default().push(category.id);
            }
        }
        Self { categories, children }
    }

    pub fn roots(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.parent_id.is_none())
            .collect()
    }

    pub fn children_of(&self, id: i64) -> Vec<&Category> {
        self.children
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|child_id| self.categories.iter().find(|c| c.id == *child_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ids of every descendant of `id`, depth-first.
    pub fn descendant_ids(&self, id: i64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(child_ids) = self.children.get(&current) {
                for &child_id in child_ids {
                    // Guard against pre-existing cycles in loaded data
                    if child_id != id && !out.contains(&child_id) {
                        out.push(child_id);
                        stack.push(child_id);
                    }
                }
            }
        }
        out
    }

    /// Categories that may legally become the parent of `id`: everything
    /// except the node itself and its descendants.
    pub fn assignable_parents(&self, id: i64) -> Vec<&Category> {
        let excluded = self.descendant_ids(id);
        self.categories
            .iter()
            .filter(|c| c.id != id && !excluded.contains(&c.id))
            .collect()
    }

    /// Check whether assigning `proposed_parent` to `id` would create a
    /// cycle. Rejects self-parenting and any descendant of `id`.
    pub fn reparent_creates_cycle(&self, id: i64, proposed_parent: i64) -> bool {
        proposed_parent == id || self.descendant_ids(id).contains(&proposed_parent)
    }
}
