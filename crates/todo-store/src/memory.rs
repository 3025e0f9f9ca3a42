// crates/todo-store/src/memory.rs
//
// In-memory `TodoStore` backed by a vector under an RwLock.
//
// Items are kept in insertion order, which is the storage order `list_items`
// reports. Used by tests and by the daemon's `memory` storage backend.

use std::sync::RwLock;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use todo_core::error::TodoError;
use todo_core::item::{ItemId, ToDoFields, ToDoItem};
use todo_core::traits::{ItemStream, TodoStore};

/// In-memory to-do store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<ToDoItem>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of items currently stored.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Return whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> TodoError {
    TodoError::Storage(format!("RwLock poisoned: {}", e))
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn insert_item(&self, fields: &ToDoFields) -> Result<ItemId, TodoError> {
        let id = ItemId::generate();
        let mut items = self.items.write().map_err(poisoned)?;
        items.push(ToDoItem::new(id, fields.clone()));
        Ok(id)
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<ToDoItem>, TodoError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.iter().find(|item| item.id == *id).cloned())
    }

    async fn list_items(&self) -> Result<ItemStream, TodoError> {
        // Snapshot so the stream does not hold the lock across sends.
        let snapshot = self.items.read().map_err(poisoned)?.clone();
        Ok(stream::iter(snapshot.into_iter().map(Ok)).boxed())
    }

    async fn replace_fields(&self, id: &ItemId, fields: &ToDoFields) -> Result<bool, TodoError> {
        let mut items = self.items.write().map_err(poisoned)?;
        match items.iter_mut().find(|item| item.id == *id) {
            Some(item) => {
                item.fields = fields.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, id: &ItemId) -> Result<bool, TodoError> {
        let mut items = self.items.write().map_err(poisoned)?;
        match items.iter().position(|item| item.id == *id) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::TryStreamExt;

    fn fields(title: &str) -> ToDoFields {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        ToDoFields {
            title: title.to_string(),
            description: format!("{} description", title),
            insert_at: t,
            update_at: t,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = InMemoryStore::new();
        let id = store.insert_item(&fields("a")).await.unwrap();

        let item = store.get_item(&id).await.unwrap().unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.fields, fields("a"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let store = InMemoryStore::new();
        store.insert_item(&fields("a")).await.unwrap();
        assert!(store.get_item(&ItemId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = InMemoryStore::new();
        let a = store.insert_item(&fields("a")).await.unwrap();
        let b = store.insert_item(&fields("b")).await.unwrap();
        let c = store.insert_item(&fields("c")).await.unwrap();

        let items: Vec<ToDoItem> = store.list_items().await.unwrap().try_collect().await.unwrap();
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = InMemoryStore::new();
        let items: Vec<ToDoItem> = store.list_items().await.unwrap().try_collect().await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_replace_overwrites_all_fields() {
        let store = InMemoryStore::new();
        let id = store.insert_item(&fields("a")).await.unwrap();

        let mut replacement = fields("X");
        replacement.description = String::new();
        assert!(store.replace_fields(&id, &replacement).await.unwrap());

        let item = store.get_item(&id).await.unwrap().unwrap();
        assert_eq!(item.fields.title, "X");
        assert_eq!(item.fields.description, "");
    }

    #[tokio::test]
    async fn test_replace_unknown_reports_no_match() {
        let store = InMemoryStore::new();
        assert!(!store.replace_fields(&ItemId::generate(), &fields("a")).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_only_removes_target() {
        let store = InMemoryStore::new();
        let a = store.insert_item(&fields("a")).await.unwrap();
        let b = store.insert_item(&fields("b")).await.unwrap();

        assert!(store.delete_item(&a).await.unwrap());
        assert!(!store.delete_item(&a).await.unwrap());
        assert!(!store.delete_item(&ItemId::generate()).await.unwrap());

        assert!(store.get_item(&a).await.unwrap().is_none());
        assert!(store.get_item(&b).await.unwrap().is_some());
        assert_eq!(store.len(), 1);
    }
}
