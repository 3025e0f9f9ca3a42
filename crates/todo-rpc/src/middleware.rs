// crates/todo-rpc/src/middleware.rs
//
// Logging interceptor for the gRPC server.

use tonic::{Request, Status};

/// Logging interceptor for tonic gRPC requests.
///
/// Logs the metadata and deadline of each incoming call using the `tracing` crate.
pub fn logging_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    let deadline = req
        .metadata()
        .get("grpc-timeout")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    tracing::info!(deadline = %deadline, "Incoming RPC request: {:?}", req.metadata());
    Ok(req)
}
