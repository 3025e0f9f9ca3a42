// crates/todo-rpc/src/server.rs
//
// RPC server setup: TodoRpcServer, RpcConfig, and the tonic service wiring.
//
// The `todo.v1.ToDoService` service is implemented directly as a tower
// service over prost-derived messages. Each request path is routed to a
// handler in `handlers::todo` through tonic's `Grpc` codec driver, which
// takes care of framing, compression headers, and status trailers.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http_body::Body as HttpBody;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{BoxFuture, StdError};
use tonic::server::{Grpc, NamedService, ServerStreamingService, UnaryService};
use tonic::service::interceptor::InterceptedService;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tonic::{Code, Status};

use todo_core::traits::TodoStore;

use crate::handlers;
use crate::handlers::todo::ReadAllStream;
use crate::middleware;
use crate::proto::{ReadAllRequest, ReadAllResponse};

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// ---------------------------------------------------------------------------
// TodoRpcServer
// ---------------------------------------------------------------------------

/// The gRPC server for the to-do service.
///
/// Holds the injected store; every handler shares it and nothing else.
#[derive(Clone)]
pub struct TodoRpcServer {
    /// Server configuration.
    config: RpcConfig,
    /// Persistence backend used by every handler.
    store: Arc<dyn TodoStore>,
}

impl std::fmt::Debug for TodoRpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoRpcServer")
            .field("config", &self.config)
            .finish()
    }
}

impl TodoRpcServer {
    /// Create a new TodoRpcServer.
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port).
    /// * `store` - Shared persistence backend.
    pub fn new(config: RpcConfig, store: Arc<dyn TodoStore>) -> Self {
        Self { config, store }
    }

    /// The tonic service, wrapped in the logging interceptor.
    pub fn service(
        &self,
    ) -> InterceptedService<ToDoServiceServer, fn(tonic::Request<()>) -> Result<tonic::Request<()>, Status>>
    {
        InterceptedService::new(
            ToDoServiceServer::new(self.store.clone()),
            middleware::logging_interceptor as fn(_) -> _,
        )
    }

    fn router(&self) -> Router {
        Server::builder().add_service(self.service())
    }

    /// Serve on the configured address until `signal` resolves.
    pub async fn serve_with_shutdown<F>(
        &self,
        signal: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!("To-do RPC server starting on {}", addr);

        self.router().serve_with_shutdown(addr, signal).await?;

        tracing::info!("To-do RPC server stopped");
        Ok(())
    }

    /// Serve connections accepted from an already bound listener until `signal` resolves.
    ///
    /// Useful when the caller binds port 0 and needs the actual address first.
    pub async fn serve_with_listener<F>(
        &self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("To-do RPC server listening on {}", addr);
        }

        self.router()
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// gRPC Service Definition (manual, no proto codegen)
// ---------------------------------------------------------------------------

/// Fully-qualified gRPC service name.
pub const SERVICE_NAME: &str = "todo.v1.ToDoService";

/// The tonic service. Routes each method path to its handler.
#[derive(Clone)]
pub struct ToDoServiceServer {
    store: Arc<dyn TodoStore>,
}

impl std::fmt::Debug for ToDoServiceServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToDoServiceServer").finish()
    }
}

impl ToDoServiceServer {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

impl NamedService for ToDoServiceServer {
    const NAME: &'static str = SERVICE_NAME;
}

impl<B> tower_service::Service<http::Request<B>> for ToDoServiceServer
where
    B: HttpBody + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let store = self.store.clone();

        match req.uri().path() {
            "/todo.v1.ToDoService/Create" => unary(store, req, |store, r| async move {
                handlers::todo::handle_create(&store, r).await
            }),
            "/todo.v1.ToDoService/Read" => unary(store, req, |store, r| async move {
                handlers::todo::handle_read(&store, r).await
            }),
            "/todo.v1.ToDoService/Update" => unary(store, req, |store, r| async move {
                handlers::todo::handle_update(&store, r).await
            }),
            "/todo.v1.ToDoService/Delete" => unary(store, req, |store, r| async move {
                handlers::todo::handle_delete(&store, r).await
            }),
            "/todo.v1.ToDoService/ReadAll" => Box::pin(async move {
                let mut grpc = Grpc::new(ProstCodec::<ReadAllResponse, ReadAllRequest>::default());
                Ok(grpc.server_streaming(ReadAllMethod { store }, req).await)
            }),
            path => {
                tracing::warn!("Unknown RPC method: {}", path);
                Box::pin(async move { Ok(unimplemented_response()) })
            }
        }
    }
}

/// Drive one unary call: decode the request, run the handler, encode the reply.
fn unary<Req, Resp, F, Fut, B>(
    store: Arc<dyn TodoStore>,
    req: http::Request<B>,
    handler: F,
) -> BoxFuture<http::Response<BoxBody>, Infallible>
where
    Req: prost::Message + Default + Send + 'static,
    Resp: prost::Message + Send + 'static,
    F: Fn(Arc<dyn TodoStore>, Req) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Resp, Status>> + Send + 'static,
    B: HttpBody + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    Box::pin(async move {
        let method = UnaryMethod { store, handler };
        let mut grpc = Grpc::new(ProstCodec::<Resp, Req>::default());
        Ok(grpc.unary(method, req).await)
    })
}

struct UnaryMethod<F> {
    store: Arc<dyn TodoStore>,
    handler: F,
}

impl<Req, Resp, F, Fut> UnaryService<Req> for UnaryMethod<F>
where
    F: Fn(Arc<dyn TodoStore>, Req) -> Fut,
    Fut: Future<Output = Result<Resp, Status>> + Send + 'static,
    Resp: Send + 'static,
{
    type Response = Resp;
    type Future = BoxFuture<tonic::Response<Resp>, Status>;

    fn call(&mut self, request: tonic::Request<Req>) -> Self::Future {
        let fut = (self.handler)(self.store.clone(), request.into_inner());
        Box::pin(async move { fut.await.map(tonic::Response::new) })
    }
}

struct ReadAllMethod {
    store: Arc<dyn TodoStore>,
}

impl ServerStreamingService<ReadAllRequest> for ReadAllMethod {
    type Response = ReadAllResponse;
    type ResponseStream = ReadAllStream;
    type Future = BoxFuture<tonic::Response<ReadAllStream>, Status>;

    fn call(&mut self, request: tonic::Request<ReadAllRequest>) -> Self::Future {
        let store = self.store.clone();
        Box::pin(async move {
            handlers::todo::handle_read_all(&store, request.into_inner())
                .await
                .map(tonic::Response::new)
        })
    }
}

/// Trailers-only response for a method this service does not define.
fn unimplemented_response() -> http::Response<BoxBody> {
    let mut response = http::Response::new(tonic::body::empty_body());
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("grpc-status"),
        HeaderValue::from(Code::Unimplemented as i32),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/grpc"));
    response
}
