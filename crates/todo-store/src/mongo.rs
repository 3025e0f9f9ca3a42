// crates/todo-store/src/mongo.rs
//
// MongoDB-backed persistent storage for to-do items.
//
// All items live in one collection; every operation is a single-document
// call keyed on `_id`. The driver's client is internally pooled and safe to
// share across concurrent requests.

use async_trait::async_trait;
use bson::doc;
use futures::StreamExt;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use todo_core::error::TodoError;
use todo_core::item::{ItemId, ToDoFields, ToDoItem};
use todo_core::traits::{ItemStream, TodoStore};

use crate::document::TodoDocument;

/// Connection settings for the MongoDB backend.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Collection holding the to-do documents.
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "mydb".to_string(),
            collection: "Todo".to_string(),
        }
    }
}

/// MongoDB client wrapper implementing the `TodoStore` trait.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<TodoDocument>,
}

impl MongoStore {
    /// Build a client for the configured deployment.
    ///
    /// The driver connects lazily; call [`MongoStore::ping`] to verify the
    /// server is reachable.
    pub async fn connect(config: &MongoConfig) -> Result<Self, TodoError> {
        let options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| TodoError::Storage(format!("Invalid MongoDB URI {}: {}", config.uri, e)))?;
        let client = Client::with_options(options)
            .map_err(|e| TodoError::Storage(format!("Failed to create MongoDB client: {}", e)))?;
        let collection = client
            .database(&config.database)
            .collection::<TodoDocument>(&config.collection);

        Ok(Self { client, collection })
    }

    /// Round-trip a `ping` command to the server.
    pub async fn ping(&self) -> Result<(), TodoError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| TodoError::Storage(format!("MongoDB ping failed: {}", e)))?;
        Ok(())
    }
}

/// Map a driver error, separating document decode failures from the rest.
fn map_driver_error(context: &str, e: mongodb::error::Error) -> TodoError {
    match e.kind.as_ref() {
        ErrorKind::BsonDeserialization(de) => {
            TodoError::Decode(format!("Could not decode data to TodoItem: {}", de))
        }
        _ => TodoError::Storage(format!("{}: {}", context, e)),
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn insert_item(&self, fields: &ToDoFields) -> Result<ItemId, TodoError> {
        let result = self
            .collection
            .insert_one(TodoDocument::from_fields(fields), None)
            .await
            .map_err(|e| map_driver_error("MongoDB insert failed", e))?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            TodoError::Storage(format!("Inserted id is not an ObjectId: {}", result.inserted_id))
        })?;
        Ok(oid.into())
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<ToDoItem>, TodoError> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.object_id() }, None)
            .await
            .map_err(|e| map_driver_error("MongoDB find failed", e))?;

        found.map(TodoDocument::into_item).transpose()
    }

    async fn list_items(&self) -> Result<ItemStream, TodoError> {
        let cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(|e| map_driver_error("MongoDB query failed", e))?;

        Ok(cursor
            .map(|next| {
                next.map_err(|e| map_driver_error("MongoDB cursor error", e))
                    .and_then(TodoDocument::into_item)
            })
            .boxed())
    }

    async fn replace_fields(&self, id: &ItemId, fields: &ToDoFields) -> Result<bool, TodoError> {
        let update = bson::to_document(&TodoDocument::from_fields(fields))
            .map_err(|e| TodoError::Storage(format!("Failed to encode update: {}", e)))?;

        let result = self
            .collection
            .update_one(doc! { "_id": id.object_id() }, doc! { "$set": update }, None)
            .await
            .map_err(|e| map_driver_error("MongoDB update failed", e))?;

        Ok(result.matched_count > 0)
    }

    async fn delete_item(&self, id: &ItemId) -> Result<bool, TodoError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() }, None)
            .await
            .map_err(|e| map_driver_error("MongoDB delete failed", e))?;

        Ok(result.deleted_count > 0)
    }
}
