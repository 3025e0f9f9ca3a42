// crates/todo-store/src/document.rs
//
// Persisted representation of a to-do item.
//
// Document shape in the collection:
//   { _id: ObjectId, title: string, description: string,
//     insertat: Date, updateat: Date }
//
// BSON dates carry millisecond precision, so sub-millisecond parts of the
// caller's timestamps are truncated on write.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use todo_core::error::TodoError;
use todo_core::item::{ToDoFields, ToDoItem};

/// A to-do item as stored in MongoDB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    /// Absent on insert so the driver assigns one.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    #[serde(rename = "insertat")]
    pub insert_at: bson::DateTime,
    #[serde(rename = "updateat")]
    pub update_at: bson::DateTime,
}

impl TodoDocument {
    /// Build an id-less document from the writable fields.
    pub fn from_fields(fields: &ToDoFields) -> Self {
        Self {
            id: None,
            title: fields.title.clone(),
            description: fields.description.clone(),
            insert_at: to_bson_datetime(&fields.insert_at),
            update_at: to_bson_datetime(&fields.update_at),
        }
    }

    /// Convert a stored document into a domain item.
    pub fn into_item(self) -> Result<ToDoItem, TodoError> {
        let id = self
            .id
            .ok_or_else(|| TodoError::Decode("document has no _id".to_string()))?;
        Ok(ToDoItem::new(
            id.into(),
            ToDoFields {
                title: self.title,
                description: self.description,
                insert_at: from_bson_datetime(self.insert_at)?,
                update_at: from_bson_datetime(self.update_at)?,
            },
        ))
    }
}

fn to_bson_datetime(dt: &DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> Result<DateTime<Utc>, TodoError> {
    let millis = dt.timestamp_millis();
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| TodoError::Decode(format!("stored date out of range: {} ms", millis)))
}
