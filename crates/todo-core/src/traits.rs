// crates/todo-core/src/traits.rs

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::TodoError;
use crate::item::{ItemId, ToDoFields, ToDoItem};

/// Lazy, finite sequence of stored items in storage order.
///
/// An `Err` element means that one document could not be read; consumers
/// stop at the first one.
pub type ItemStream = BoxStream<'static, Result<ToDoItem, TodoError>>;

/// Trait for persistent to-do item storage.
///
/// Implemented by todo-store (MongoDB backend and an in-memory backend).
/// Implementations must be safe for concurrent independent use.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Insert a new item and return the identifier the store assigned.
    async fn insert_item(&self, fields: &ToDoFields) -> Result<ItemId, TodoError>;

    /// Retrieve an item by identifier. `Ok(None)` when nothing matches.
    async fn get_item(&self, id: &ItemId) -> Result<Option<ToDoItem>, TodoError>;

    /// Open a stream over every stored item.
    async fn list_items(&self) -> Result<ItemStream, TodoError>;

    /// Overwrite all writable fields of an item.
    /// Returns `false` when no item has the identifier.
    async fn replace_fields(&self, id: &ItemId, fields: &ToDoFields) -> Result<bool, TodoError>;

    /// Delete an item. Returns `false` when no item was removed.
    async fn delete_item(&self, id: &ItemId) -> Result<bool, TodoError>;
}
