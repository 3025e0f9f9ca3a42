// crates/todo-rpc/src/lib.rs
//
// todo-rpc: gRPC server, client, and HTTP/JSON gateway for the to-do service.
//
// The gRPC service `todo.v1.ToDoService` is wired by hand on top of tonic's
// server and client primitives with prost-derived messages, so no proto
// codegen step is needed. The gateway translates JSON over HTTP into calls on
// the same service.

pub mod client;
pub mod convert;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod proto;
pub mod server;

// Re-export the main server and client types for ergonomic access.
pub use client::ToDoServiceClient;
pub use gateway::GatewayConfig;
pub use server::RpcConfig;
pub use server::TodoRpcServer;
