// crates/todo-core/src/item.rs
//
// The to-do item and its identifier.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TodoError;

/// Persistence key of a to-do item: a 12-byte ObjectId, exchanged as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(ObjectId);

impl ItemId {
    /// Generate a fresh identifier. Only stores call this, at insert time.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// The underlying BSON ObjectId.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Lowercase 24-character hex form.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<ObjectId> for ItemId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ItemId {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| TodoError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// The caller-writable fields of an item. Create and Update both carry a full set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToDoFields {
    pub title: String,
    pub description: String,
    /// Creation time, as supplied by the caller.
    pub insert_at: DateTime<Utc>,
    /// Last update time, as supplied by the caller.
    pub update_at: DateTime<Utc>,
}

/// A stored to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToDoItem {
    /// Database-assigned, immutable after creation.
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: ToDoFields,
}

impl ToDoItem {
    pub fn new(id: ItemId, fields: ToDoFields) -> Self {
        Self { id, fields }
    }
}
