// crates/todo-rpc/src/gateway.rs
//
// HTTP/JSON gateway in front of the gRPC service.
//
// Pure protocol translation: each route decodes a JSON body (or path and
// query parameters) into the matching protobuf request, forwards it to the
// upstream server, and renders the reply as JSON. JSON follows the proto3
// mapping: lowerCamelCase field names and RFC 3339 timestamps.
//
//   POST   /v1/todo          -> Create
//   GET    /v1/todo/{id}     -> Read
//   GET    /v1/todos         -> ReadAll (newline-delimited JSON)
//   PUT    /v1/todo/{id}     -> Update
//   DELETE /v1/todo/{id}     -> Delete

use std::convert::Infallible;
use std::future::Future;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tonic::transport::Channel;
use tonic::{Code, Status};

use todo_core::error::TodoError;

use crate::client::ToDoServiceClient;
use crate::convert::{datetime_from_timestamp, timestamp_from_datetime};
use crate::proto::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, ToDo, UpdateRequest, UpdateResponse,
};

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Configuration for the HTTP/JSON gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// gRPC server every request is forwarded to.
    pub upstream: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8081,
            upstream: "http://localhost:8080".to_string(),
        }
    }
}

/// Bind the configured address and serve the gateway until `signal` resolves.
pub async fn serve<F>(
    config: GatewayConfig,
    signal: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let client = ToDoServiceClient::connect_lazy(config.upstream.clone())?;
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

    tracing::info!(
        "HTTP gateway listening on {}, forwarding to {}",
        listener.local_addr()?,
        config.upstream
    );

    axum::serve(listener, router(client))
        .with_graceful_shutdown(signal)
        .await?;

    tracing::info!("HTTP gateway stopped");
    Ok(())
}

/// Build the gateway routes around an upstream client.
pub fn router(client: ToDoServiceClient<Channel>) -> Router {
    Router::new()
        .route("/v1/todo", post(create_item))
        .route(
            "/v1/todo/:id",
            get(read_item).put(update_item).delete(delete_item),
        )
        .route("/v1/todos", get(read_all_items))
        .with_state(GatewayState { client })
}

#[derive(Clone)]
struct GatewayState {
    client: ToDoServiceClient<Channel>,
}

// ---------------------------------------------------------------------------
// JSON mapping
// ---------------------------------------------------------------------------

/// JSON form of `ToDo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToDoJson {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_at: Option<DateTime<Utc>>,
}

impl From<ToDoJson> for ToDo {
    fn from(json: ToDoJson) -> Self {
        ToDo {
            id: json.id,
            title: json.title,
            description: json.description,
            insert_at: json.insert_at.as_ref().map(timestamp_from_datetime),
            update_at: json.update_at.as_ref().map(timestamp_from_datetime),
        }
    }
}

/// An absent timestamp stays absent; a present one must be valid.
impl TryFrom<ToDo> for ToDoJson {
    type Error = TodoError;

    fn try_from(to_do: ToDo) -> Result<Self, Self::Error> {
        Ok(ToDoJson {
            insert_at: optional_datetime("insert_at", to_do.insert_at.as_ref())?,
            update_at: optional_datetime("update_at", to_do.update_at.as_ref())?,
            id: to_do.id,
            title: to_do.title,
            description: to_do.description,
        })
    }
}

fn optional_datetime(
    field: &'static str,
    ts: Option<&prost_types::Timestamp>,
) -> Result<Option<DateTime<Utc>>, TodoError> {
    ts.map(|ts| datetime_from_timestamp(field, Some(ts))).transpose()
}

/// JSON body of Create and Update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemRequestJson {
    pub api: String,
    pub to_do: Option<ToDoJson>,
}

/// JSON form of the replies carrying an item (Read, ReadAll elements).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemResponseJson {
    pub api: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_do: Option<ToDoJson>,
}

impl TryFrom<ReadResponse> for ItemResponseJson {
    type Error = TodoError;

    fn try_from(resp: ReadResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            api: resp.api,
            to_do: resp.to_do.map(ToDoJson::try_from).transpose()?,
        })
    }
}

impl TryFrom<ReadAllResponse> for ItemResponseJson {
    type Error = TodoError;

    fn try_from(resp: ReadAllResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            api: resp.api,
            to_do: resp.to_do.map(ToDoJson::try_from).transpose()?,
        })
    }
}

/// Status for an upstream reply that cannot be rendered as JSON.
fn malformed_reply(err: TodoError) -> Status {
    Status::internal(format!("malformed upstream reply: {}", err))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponseJson {
    pub api: String,
    pub id: String,
}

impl From<CreateResponse> for CreateResponseJson {
    fn from(resp: CreateResponse) -> Self {
        Self { api: resp.api, id: resp.id }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponseJson {
    pub api: String,
    pub updated: String,
}

impl From<UpdateResponse> for UpdateResponseJson {
    fn from(resp: UpdateResponse) -> Self {
        Self { api: resp.api, updated: resp.updated }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponseJson {
    pub api: String,
    pub deleted: String,
}

impl From<DeleteResponse> for DeleteResponseJson {
    fn from(resp: DeleteResponse) -> Self {
        Self { api: resp.api, deleted: resp.deleted }
    }
}

/// Error body rendered for a failed call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorJson {
    pub code: i32,
    pub message: String,
    pub details: Vec<serde_json::Value>,
}

impl From<&Status> for ErrorJson {
    fn from(status: &Status) -> Self {
        Self {
            code: status.code() as i32,
            message: status.message().to_string(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    api: String,
}

/// HTTP status for a gRPC code.
pub fn http_status_for(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            StatusCode::BAD_REQUEST
        }
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn status_response(status: &Status) -> Response {
    (http_status_for(status.code()), Json(ErrorJson::from(status))).into_response()
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        status_response(&Status::invalid_argument(format!("invalid JSON body: {}", e)))
    })
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

async fn create_item(State(state): State<GatewayState>, body: Bytes) -> Response {
    let body: ItemRequestJson = match parse_body(&body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    let request = CreateRequest {
        api: body.api,
        to_do: body.to_do.map(ToDo::from),
    };

    let mut client = state.client;
    match client.create(request).await {
        Ok(resp) => Json(CreateResponseJson::from(resp.into_inner())).into_response(),
        Err(status) => status_response(&status),
    }
}

async fn read_item(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Response {
    let mut client = state.client;
    let reply = client
        .read(ReadRequest { api: query.api, id })
        .await
        .and_then(|resp| ItemResponseJson::try_from(resp.into_inner()).map_err(malformed_reply));
    match reply {
        Ok(json) => Json(json).into_response(),
        Err(status) => status_response(&status),
    }
}

async fn update_item(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let body: ItemRequestJson = match parse_body(&body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    // The path parameter names the item, whatever the body says.
    let mut to_do = body.to_do.map(ToDo::from).unwrap_or_default();
    to_do.id = id;

    let mut client = state.client;
    let request = UpdateRequest {
        api: body.api,
        to_do: Some(to_do),
    };
    match client.update(request).await {
        Ok(resp) => Json(UpdateResponseJson::from(resp.into_inner())).into_response(),
        Err(status) => status_response(&status),
    }
}

async fn delete_item(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Response {
    let mut client = state.client;
    match client.delete(DeleteRequest { api: query.api, id }).await {
        Ok(resp) => Json(DeleteResponseJson::from(resp.into_inner())).into_response(),
        Err(status) => status_response(&status),
    }
}

/// ReadAll as newline-delimited JSON: one `{"result": ...}` line per item,
/// and a final `{"error": ...}` line if the stream fails part way.
async fn read_all_items(State(state): State<GatewayState>, Query(query): Query<ApiQuery>) -> Response {
    let mut client = state.client;
    let mut stream = match client.read_all(ReadAllRequest { api: query.api }).await {
        Ok(resp) => resp.into_inner(),
        Err(status) => return status_response(&status),
    };

    let lines = async_stream::stream! {
        loop {
            let next = stream
                .message()
                .await
                .and_then(|msg| msg.map(ItemResponseJson::try_from).transpose().map_err(malformed_reply));
            match next {
                Ok(Some(item)) => {
                    let line = serde_json::json!({ "result": item });
                    yield Ok::<_, Infallible>(ndjson_line(&line));
                }
                Ok(None) => break,
                Err(status) => {
                    tracing::warn!("ReadAll stream failed: {}", status);
                    let line = serde_json::json!({ "error": ErrorJson::from(&status) });
                    yield Ok(ndjson_line(&line));
                    break;
                }
            }
        }
    };

    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(lines),
    )
        .into_response()
}

fn ndjson_line(value: &serde_json::Value) -> Bytes {
    let mut line = serde_json::to_vec(value).unwrap_or_default();
    line.push(b'\n');
    Bytes::from(line)
}
