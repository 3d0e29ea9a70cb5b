use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::errors::AppError;

pub const DEFAULT_CATEGORIES: [&str; 3] = ["Beverages", "Condiments", "Confections"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub cid: usize,
    pub name: String,
}

/// Ordered category collection addressed by 1-based position.
///
/// A category's `cid` is always its current position, so removing one
/// renumbers every category after it.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> Vec<Category>;
    async fn get(&self, position: i64) -> Result<Category, AppError>;
    async fn create(&self, name: String) -> Result<Category, AppError>;
    async fn update(&self, position: i64, name: String) -> Result<Category, AppError>;
    async fn delete(&self, position: i64) -> Result<Category, AppError>;
    async fn len(&self) -> usize;
}

/// Every operation holds the lock for its whole read-modify-write span.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    names: Mutex<Vec<String>>,
}

impl InMemoryCategoryStore {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Mutex::new(names.into_iter().map(Into::into).collect()),
        }
    }

    pub fn seeded() -> Self {
        Self::new(DEFAULT_CATEGORIES)
    }
}

fn to_index(position: i64, len: usize) -> Result<usize, AppError> {
    usize::try_from(position)
        .ok()
        .filter(|position| (1..=len).contains(position))
        .map(|position| position - 1)
        .ok_or_else(|| AppError::bad_request("invalid position"))
}

fn category_at(index: usize, name: &str) -> Category {
    Category {
        cid: index + 1,
        name: name.to_string(),
    }
}

fn require_name(name: String) -> Result<String, AppError> {
    if name.is_empty() {
        return Err(AppError::bad_request("missing name"));
    }
    Ok(name)
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn list(&self) -> Vec<Category> {
        let names = self.names.lock().await;
        names
            .iter()
            .enumerate()
            .map(|(index, name)| category_at(index, name))
            .collect()
    }

    async fn get(&self, position: i64) -> Result<Category, AppError> {
        let names = self.names.lock().await;
        let index = to_index(position, names.len())?;
        Ok(category_at(index, &names[index]))
    }

    async fn create(&self, name: String) -> Result<Category, AppError> {
        let name = require_name(name)?;
        let mut names = self.names.lock().await;
        names.push(name);
        let index = names.len() - 1;
        Ok(category_at(index, &names[index]))
    }

    async fn update(&self, position: i64, name: String) -> Result<Category, AppError> {
        let name = require_name(name)?;
        let mut names = self.names.lock().await;
        let index = to_index(position, names.len())?;
        names[index] = name;
        Ok(category_at(index, &names[index]))
    }

    async fn delete(&self, position: i64) -> Result<Category, AppError> {
        let mut names = self.names.lock().await;
        let index = to_index(position, names.len())?;
        let name = names.remove(index);
        Ok(category_at(index, &name))
    }

    async fn len(&self) -> usize {
        self.names.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn seeded_store_lists_in_order() {
        let store = InMemoryCategoryStore::seeded();
        let categories = store.list().await;

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0], Category { cid: 1, name: "Beverages".to_string() });
        assert_eq!(categories[2], Category { cid: 3, name: "Confections".to_string() });
    }

    #[tokio::test]
    async fn create_appends_with_next_id() {
        let store = InMemoryCategoryStore::seeded();
        let created = store.create("Dairy".to_string()).await.expect("create succeeds");

        assert_eq!(created.cid, 4);
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn create_rejects_empty_name_without_mutation() {
        let store = InMemoryCategoryStore::seeded();
        let err = store.create(String::new()).await.expect_err("empty name fails");

        assert_eq!(err, AppError::bad_request("missing name"));
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn whitespace_name_is_a_valid_name() {
        let store = InMemoryCategoryStore::seeded();
        let created = store.create(" ".to_string()).await.expect("create succeeds");

        assert_eq!(created, Category { cid: 4, name: " ".to_string() });
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn get_rejects_out_of_range_positions() {
        let store = InMemoryCategoryStore::seeded();
        for position in [0, -1, 4, i64::MAX] {
            let err = store.get(position).await.expect_err("position out of range");
            assert_eq!(err, AppError::bad_request("invalid position"));
        }
        assert_eq!(store.get(3).await.expect("last position").name, "Confections");
    }

    #[tokio::test]
    async fn update_keeps_position_id() {
        let store = InMemoryCategoryStore::seeded();
        let updated = store
            .update(2, "Sauces".to_string())
            .await
            .expect("update succeeds");

        assert_eq!(updated, Category { cid: 2, name: "Sauces".to_string() });
        assert_eq!(store.get(2).await.expect("read back"), updated);
    }

    #[tokio::test]
    async fn failed_update_leaves_store_untouched() {
        let store = InMemoryCategoryStore::seeded();
        store.update(9, "Sauces".to_string()).await.expect_err("bad position");
        store.update(1, String::new()).await.expect_err("missing name");

        assert_eq!(
            store.list().await.into_iter().map(|c| c.name).collect::<Vec<_>>(),
            DEFAULT_CATEGORIES
        );
    }

    #[tokio::test]
    async fn delete_shifts_later_positions_down() {
        let store = InMemoryCategoryStore::seeded();
        let removed = store.delete(1).await.expect("delete succeeds");
        assert_eq!(removed.name, "Beverages");

        let categories = store.list().await;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0], Category { cid: 1, name: "Condiments".to_string() });
        assert_eq!(categories[1], Category { cid: 2, name: "Confections".to_string() });
    }

    #[tokio::test]
    async fn ids_stay_dense_after_delete_then_create() {
        let store = InMemoryCategoryStore::seeded();
        store.delete(2).await.expect("delete succeeds");
        let created = store.create("Dairy".to_string()).await.expect("create succeeds");

        assert_eq!(created.cid, 3);
        let ids = store.list().await.into_iter().map(|c| c.cid).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_serialized() {
        let store = Arc::new(InMemoryCategoryStore::new(Vec::<String>::new()));
        let mut handles = Vec::new();
        for n in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(format!("category-{n}")).await
            }));
        }
        for handle in handles {
            handle.await.expect("task joins").expect("create succeeds");
        }

        let ids = store.list().await.into_iter().map(|c| c.cid).collect::<Vec<_>>();
        assert_eq!(ids, (1..=50usize).collect::<Vec<_>>());
    }
}
