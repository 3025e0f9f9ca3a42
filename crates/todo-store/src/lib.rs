// crates/todo-store/src/lib.rs
//
// todo-store: Storage layer for the to-do service.
//
// Provides the MongoDB-backed `TodoStore` used in production and an
// in-memory `TodoStore` used by tests and the `memory` storage backend.

pub mod document;
pub mod memory;
pub mod mongo;

// Re-export key types for ergonomic access from downstream crates.
pub use document::TodoDocument;
pub use memory::InMemoryStore;
pub use mongo::{MongoConfig, MongoStore};
