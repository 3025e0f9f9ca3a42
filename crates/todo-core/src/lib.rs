// crates/todo-core/src/lib.rs
//
// todo-core: Core types, errors, and traits for the to-do service.
//
// This is the leaf crate that every other crate in the workspace depends on.
// It defines the domain item, the identifier newtype, the API-version guard,
// the error enum, and the `TodoStore` trait that persistence backends implement.

pub mod api;
pub mod error;
pub mod item;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use todo_core::ToDoItem;`
pub use api::{check_api, API_VERSION};
pub use error::TodoError;
pub use item::{ItemId, ToDoFields, ToDoItem};
pub use traits::{ItemStream, TodoStore};
