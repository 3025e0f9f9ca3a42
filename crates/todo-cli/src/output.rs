// crates/todo-cli/src/output.rs
//
// Output formatting utilities for the to-do CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use todo_core::TodoError;
use todo_rpc::gateway::ToDoJson;
use todo_rpc::proto::ToDo;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// One table row per item.
#[derive(Debug, Tabled)]
pub struct ToDoRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Inserted")]
    pub insert_at: String,
    #[tabled(rename = "Updated")]
    pub update_at: String,
}

impl TryFrom<&ToDo> for ToDoRow {
    type Error = TodoError;

    fn try_from(to_do: &ToDo) -> Result<Self, Self::Error> {
        let json = ToDoJson::try_from(to_do.clone())?;
        let stamp = |dt: Option<chrono::DateTime<chrono::Utc>>| {
            dt.map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
                .unwrap_or_else(|| "-".to_string())
        };
        Ok(Self {
            id: json.id,
            title: truncate(&json.title, 40),
            description: truncate(&json.description, 60),
            insert_at: stamp(json.insert_at),
            update_at: stamp(json.update_at),
        })
    }
}

/// Render items in the chosen format. Fails on a malformed timestamp.
pub fn render_items(items: &[ToDo], format: OutputFormat) -> Result<String, TodoError> {
    match format {
        OutputFormat::Table => {
            let rows = items
                .iter()
                .map(ToDoRow::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format_table(&rows))
        }
        OutputFormat::Json => {
            let items = items
                .iter()
                .cloned()
                .map(ToDoJson::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format_json(&items))
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// Truncate a string to the given number of characters, appending "..." if truncated.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
