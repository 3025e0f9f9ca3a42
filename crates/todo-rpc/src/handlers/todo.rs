// crates/todo-rpc/src/handlers/todo.rs
//
// To-do handlers: Create, Read, ReadAll, Update, Delete.
//
// Each handler checks the API version tag before anything else, converts the
// wire message into domain types, and issues one call on the injected
// `TodoStore`. Failures are mapped to gRPC status codes here.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Status;

use todo_core::api::{check_api, API_VERSION};
use todo_core::error::TodoError;
use todo_core::item::ItemId;
use todo_core::traits::TodoStore;

use crate::convert::{fields_from_to_do, to_do_from_item};
use crate::proto::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};

/// Number of ReadAll elements buffered ahead of the client.
const READ_ALL_BUFFER: usize = 16;

/// Stream of ReadAll elements handed to the transport.
pub type ReadAllStream = ReceiverStream<Result<ReadAllResponse, Status>>;

/// Default mapping from a domain error to a gRPC status.
pub fn status_from_error(err: TodoError) -> Status {
    let message = err.to_string();
    match err {
        TodoError::UnsupportedApi(_)
        | TodoError::InvalidId(_)
        | TodoError::InvalidTimestamp(_)
        | TodoError::MissingField(_) => Status::invalid_argument(message),
        TodoError::NotFound(_) => Status::not_found(message),
        TodoError::Storage(_) => Status::internal(message),
        TodoError::Decode(_) => Status::unavailable(message),
    }
}

fn not_found(id: &str) -> Status {
    status_from_error(TodoError::NotFound(format!(
        "Could not find todo item with id {}",
        id
    )))
}

fn parse_id(raw: &str) -> Result<ItemId, Status> {
    raw.parse::<ItemId>().map_err(|e| {
        Status::invalid_argument(format!("Could not convert object ID from the request: {}", e))
    })
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Handle a Create request. Any caller-supplied id is ignored.
pub async fn handle_create(
    store: &Arc<dyn TodoStore>,
    request: CreateRequest,
) -> Result<CreateResponse, Status> {
    check_api(&request.api).map_err(status_from_error)?;

    let to_do = request
        .to_do
        .ok_or_else(|| status_from_error(TodoError::MissingField("to_do")))?;
    let fields = fields_from_to_do(&to_do).map_err(status_from_error)?;

    let id = store
        .insert_item(&fields)
        .await
        .map_err(|e| Status::internal(format!("internal error: {}", e)))?;

    tracing::info!(%id, title = %fields.title, "Created todo item");

    Ok(CreateResponse {
        api: request.api,
        id: id.to_hex(),
    })
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Handle a Read request.
pub async fn handle_read(
    store: &Arc<dyn TodoStore>,
    request: ReadRequest,
) -> Result<ReadResponse, Status> {
    check_api(&request.api).map_err(status_from_error)?;
    let id = parse_id(&request.id)?;

    // Decode failures count as database faults on Read.
    let item = store
        .get_item(&id)
        .await
        .map_err(|e| Status::internal(format!("internal error: {}", e)))?
        .ok_or_else(|| not_found(&request.id))?;

    Ok(ReadResponse {
        api: request.api,
        to_do: Some(to_do_from_item(&item)),
    })
}

// ---------------------------------------------------------------------------
// ReadAll
// ---------------------------------------------------------------------------

/// Handle a ReadAll request.
///
/// A spawned task drains the store's stream into a bounded channel, one
/// element at a time. It stops at the first failed element, which is sent
/// as the final status, or as soon as the client stops receiving.
pub async fn handle_read_all(
    store: &Arc<dyn TodoStore>,
    request: ReadAllRequest,
) -> Result<ReadAllStream, Status> {
    check_api(&request.api).map_err(status_from_error)?;

    let mut items = store
        .list_items()
        .await
        .map_err(|e| Status::internal(format!("Unknown internal error: {}", e)))?;

    let (tx, rx) = mpsc::channel(READ_ALL_BUFFER);
    tokio::spawn(async move {
        let mut sent = 0usize;
        while let Some(next) = items.next().await {
            let message = next
                .map(|item| ReadAllResponse {
                    api: API_VERSION.to_string(),
                    to_do: Some(to_do_from_item(&item)),
                })
                .map_err(status_from_error);
            let failed = message.is_err();

            if tx.send(message).await.is_err() {
                tracing::debug!(sent, "ReadAll receiver dropped, closing cursor");
                return;
            }
            if failed {
                tracing::warn!(sent, "ReadAll aborted on a failed element");
                return;
            }
            sent += 1;
        }
        tracing::debug!(sent, "ReadAll stream complete");
    });

    Ok(ReceiverStream::new(rx))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Handle an Update request: a full overwrite of title, description, and both timestamps.
pub async fn handle_update(
    store: &Arc<dyn TodoStore>,
    request: UpdateRequest,
) -> Result<UpdateResponse, Status> {
    check_api(&request.api).map_err(status_from_error)?;

    let to_do = request
        .to_do
        .ok_or_else(|| status_from_error(TodoError::MissingField("to_do")))?;
    let id = parse_id(&to_do.id)?;
    let fields = fields_from_to_do(&to_do).map_err(status_from_error)?;

    let matched = store
        .replace_fields(&id, &fields)
        .await
        .map_err(|e| Status::invalid_argument(format!("Could not update todo item {}: {}", id, e)))?;
    if !matched {
        return Err(not_found(&to_do.id));
    }

    tracing::info!(%id, "Updated todo item");

    Ok(UpdateResponse {
        api: request.api,
        updated: format!("Successfully updated {}", to_do.id),
    })
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Handle a Delete request.
pub async fn handle_delete(
    store: &Arc<dyn TodoStore>,
    request: DeleteRequest,
) -> Result<DeleteResponse, Status> {
    check_api(&request.api).map_err(status_from_error)?;
    let id = parse_id(&request.id)?;

    let deleted = store.delete_item(&id).await.map_err(|e| {
        Status::internal(format!("Could not delete todo item with id {}: {}", request.id, e))
    })?;
    if !deleted {
        return Err(not_found(&request.id));
    }

    tracing::info!(%id, "Deleted todo item");

    Ok(DeleteResponse {
        api: request.api,
        deleted: format!("Successfully deleted {}", request.id),
    })
}
