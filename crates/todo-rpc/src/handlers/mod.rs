// crates/todo-rpc/src/handlers/mod.rs
//
// Handler modules for the RPC endpoints.

pub mod todo;
