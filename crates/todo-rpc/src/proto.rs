// crates/todo-rpc/src/proto.rs
//
// Protobuf messages of the `todo.v1.ToDoService` gRPC service.
//
// Every request and response carries an `api` version tag.

pub use prost_types::Timestamp;

/// Wire form of a to-do item.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ToDo {
    /// 24-hex identifier; empty on create.
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(message, optional, tag = "4")]
    pub insert_at: Option<Timestamp>,
    #[prost(message, optional, tag = "5")]
    pub update_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateRequest {
    #[prost(string, tag = "1")]
    pub api: String,
    #[prost(message, optional, tag = "2")]
    pub to_do: Option<ToDo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateResponse {
    #[prost(string, tag = "1")]
    pub api: String,
    /// Identifier assigned to the new item.
    #[prost(string, tag = "2")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadRequest {
    #[prost(string, tag = "1")]
    pub api: String,
    #[prost(string, tag = "2")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadResponse {
    #[prost(string, tag = "1")]
    pub api: String,
    #[prost(message, optional, tag = "2")]
    pub to_do: Option<ToDo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateRequest {
    #[prost(string, tag = "1")]
    pub api: String,
    /// The item to overwrite, identified by `to_do.id`.
    #[prost(message, optional, tag = "2")]
    pub to_do: Option<ToDo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateResponse {
    #[prost(string, tag = "1")]
    pub api: String,
    #[prost(string, tag = "2")]
    pub updated: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteRequest {
    #[prost(string, tag = "1")]
    pub api: String,
    #[prost(string, tag = "2")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteResponse {
    #[prost(string, tag = "1")]
    pub api: String,
    #[prost(string, tag = "2")]
    pub deleted: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadAllRequest {
    #[prost(string, tag = "1")]
    pub api: String,
}

/// One element of the ReadAll stream.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadAllResponse {
    #[prost(string, tag = "1")]
    pub api: String,
    #[prost(message, optional, tag = "2")]
    pub to_do: Option<ToDo>,
}
