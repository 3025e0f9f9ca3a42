// crates/todo-rpc/src/client.rs
//
// Typed gRPC client for `todo.v1.ToDoService`, built on tonic's generic
// `Grpc` client with prost-derived messages.

use http::uri::PathAndQuery;
use tonic::body::BoxBody;
use tonic::client::{Grpc, GrpcService};
use tonic::codec::{ProstCodec, Streaming};
use tonic::codegen::{Body, Bytes, StdError};
use tonic::transport::{Channel, Endpoint};
use tonic::{IntoRequest, Response, Status};

use crate::proto::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};

/// Client for the five to-do operations.
#[derive(Debug, Clone)]
pub struct ToDoServiceClient<T> {
    inner: Grpc<T>,
}

impl ToDoServiceClient<Channel> {
    /// Connect to a server, e.g. `http://localhost:8080`.
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(endpoint.into())?.connect().await?;
        Ok(Self::new(channel))
    }

    /// Build a client whose connection is only established on first use.
    pub fn connect_lazy(endpoint: impl Into<String>) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(endpoint.into())?.connect_lazy();
        Ok(Self::new(channel))
    }
}

impl<T> ToDoServiceClient<T>
where
    T: GrpcService<BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: Grpc::new(inner),
        }
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {}", e.into())))
    }

    /// Create an item; the response carries the assigned id.
    pub async fn create(
        &mut self,
        request: impl IntoRequest<CreateRequest>,
    ) -> Result<Response<CreateResponse>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static("/todo.v1.ToDoService/Create");
        self.inner
            .unary(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn read(
        &mut self,
        request: impl IntoRequest<ReadRequest>,
    ) -> Result<Response<ReadResponse>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static("/todo.v1.ToDoService/Read");
        self.inner
            .unary(request.into_request(), path, ProstCodec::default())
            .await
    }

    /// Open the ReadAll stream. Pull elements with `Streaming::message`.
    pub async fn read_all(
        &mut self,
        request: impl IntoRequest<ReadAllRequest>,
    ) -> Result<Response<Streaming<ReadAllResponse>>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static("/todo.v1.ToDoService/ReadAll");
        self.inner
            .server_streaming(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn update(
        &mut self,
        request: impl IntoRequest<UpdateRequest>,
    ) -> Result<Response<UpdateResponse>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static("/todo.v1.ToDoService/Update");
        self.inner
            .unary(request.into_request(), path, ProstCodec::default())
            .await
    }

    pub async fn delete(
        &mut self,
        request: impl IntoRequest<DeleteRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        self.ready().await?;
        let path = PathAndQuery::from_static("/todo.v1.ToDoService/Delete");
        self.inner
            .unary(request.into_request(), path, ProstCodec::default())
            .await
    }
}
