// crates/todo-cli/src/commands/item.rs
//
// `todo {create, get, list, update, delete}`: one RPC each.

use chrono::Utc;

use todo_rpc::convert::timestamp_from_datetime;
use todo_rpc::proto::{
    CreateRequest, DeleteRequest, ReadAllRequest, ReadRequest, ToDo, UpdateRequest,
};

use super::Session;
use crate::output::{format_json, render_items, OutputFormat};

/// Create an item stamped with the current time; returns its id.
pub async fn create(
    session: &mut Session,
    title: &str,
    description: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let now = timestamp_from_datetime(&Utc::now());
    let request = session.request(CreateRequest {
        api: session.api.clone(),
        to_do: Some(ToDo {
            id: String::new(),
            title: title.to_string(),
            description: description.to_string(),
            insert_at: Some(now.clone()),
            update_at: Some(now),
        }),
    });
    let resp = session.client.create(request).await?.into_inner();
    Ok(resp.id)
}

/// Fetch one item.
pub async fn get(session: &mut Session, id: &str) -> Result<ToDo, Box<dyn std::error::Error>> {
    let request = session.request(ReadRequest {
        api: session.api.clone(),
        id: id.to_string(),
    });
    let resp = session.client.read(request).await?.into_inner();
    resp.to_do
        .ok_or_else(|| format!("server returned no item for {}", id).into())
}

/// Collect the whole ReadAll stream.
pub async fn list(session: &mut Session) -> Result<Vec<ToDo>, Box<dyn std::error::Error>> {
    // Streaming call: no deadline, it runs until the server is done.
    let request = tonic::Request::new(ReadAllRequest {
        api: session.api.clone(),
    });
    let mut stream = session.client.read_all(request).await?.into_inner();
    let mut items = Vec::new();
    while let Some(msg) = stream.message().await? {
        if let Some(to_do) = msg.to_do {
            items.push(to_do);
        }
    }
    Ok(items)
}

/// Overwrite title and description, keep the original insert time, and
/// stamp the update time with now.
pub async fn update(
    session: &mut Session,
    id: &str,
    title: &str,
    description: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let current = get(session, id).await?;
    let request = session.request(UpdateRequest {
        api: session.api.clone(),
        to_do: Some(ToDo {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            insert_at: current.insert_at,
            update_at: Some(timestamp_from_datetime(&Utc::now())),
        }),
    });
    let resp = session.client.update(request).await?.into_inner();
    Ok(resp.updated)
}

pub async fn delete(session: &mut Session, id: &str) -> Result<String, Box<dyn std::error::Error>> {
    let request = session.request(DeleteRequest {
        api: session.api.clone(),
        id: id.to_string(),
    });
    let resp = session.client.delete(request).await?.into_inner();
    Ok(resp.deleted)
}

/// Print a one-line result message in the session's format.
pub fn print_message(format: OutputFormat, key: &str, value: &str) {
    match format {
        OutputFormat::Table => println!("{}", value),
        OutputFormat::Json => println!("{}", format_json(&serde_json::json!({ key: value }))),
    }
}

pub fn print_items(format: OutputFormat, items: &[ToDo]) -> Result<(), Box<dyn std::error::Error>> {
    if items.is_empty() && format == OutputFormat::Table {
        println!("No items found.");
    } else {
        println!("{}", render_items(items, format)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use chrono::TimeZone;
    use tonic::Code;

    use todo_core::{ItemId, ToDoFields, TodoStore};

    use crate::commands::testing::serve;

    fn fields_at(title: &str, secs: i64) -> ToDoFields {
        let at = Utc.timestamp_opt(secs, 0).unwrap();
        ToDoFields {
            title: title.to_string(),
            description: "stored".to_string(),
            insert_at: at,
            update_at: at,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (mut session, store, _shutdown) = serve().await;

        let id = create(&mut session, "demo task", "this is just a demo").await.unwrap();
        assert_eq!(store.len(), 1);

        let to_do = get(&mut session, &id).await.unwrap();
        assert_eq!(to_do.id, id);
        assert_eq!(to_do.title, "demo task");
        assert_eq!(to_do.insert_at, to_do.update_at);
    }

    #[tokio::test]
    async fn test_update_keeps_insert_time() {
        let (mut session, store, _shutdown) = serve().await;
        let id = store.insert_item(&fields_at("old", 1_600_000_000)).await.unwrap();

        let updated = update(&mut session, &id.to_hex(), "new", "").await.unwrap();
        assert_eq!(updated, format!("Successfully updated {}", id));

        let item = store.get_item(&id).await.unwrap().unwrap();
        assert_eq!(item.fields.title, "new");
        assert_eq!(item.fields.description, "");
        assert_eq!(item.fields.insert_at, Utc.timestamp_opt(1_600_000_000, 0).unwrap());
        assert!(item.fields.update_at > item.fields.insert_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails_before_writing() {
        let (mut session, store, _shutdown) = serve().await;
        let missing = ItemId::generate().to_hex();

        let err = update(&mut session, &missing, "t", "d").await.unwrap_err();
        let status = err.downcast_ref::<tonic::Status>().unwrap();
        assert_eq!(status.code(), Code::NotFound);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_collects_every_item_without_deadline() {
        let (mut session, store, _shutdown) = serve().await;
        for (i, title) in ["a", "b", "c"].iter().enumerate() {
            store.insert_item(&fields_at(title, i as i64)).await.unwrap();
        }
        // Only unary calls carry the deadline.
        session.timeout = Duration::from_nanos(1);

        let items = list(&mut session).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_removes_item() {
        let (mut session, store, _shutdown) = serve().await;
        let id = store.insert_item(&fields_at("doomed", 0)).await.unwrap();

        let deleted = delete(&mut session, &id.to_hex()).await.unwrap();
        assert_eq!(deleted, format!("Successfully deleted {}", id));
        assert!(store.is_empty());

        let err = get(&mut session, &id.to_hex()).await.unwrap_err();
        assert_eq!(err.downcast_ref::<tonic::Status>().unwrap().code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_wrong_api_tag_is_rejected() {
        let (mut session, store, _shutdown) = serve().await;
        session.api = "2".to_string();

        let err = create(&mut session, "t", "d").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<tonic::Status>().unwrap().code(),
            Code::InvalidArgument
        );
        assert!(store.is_empty());
    }
}
