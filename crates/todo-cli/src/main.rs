// crates/todo-cli/src/main.rs
//
// CLI entrypoint for the to-do service.
//
// Each subcommand issues one gRPC call against the daemon; `demo` chains
// them the way a first-time user would.

mod commands;
mod output;

use std::time::Duration;

use clap::{Parser, Subcommand};
use commands::{demo, item, Session};
use output::OutputFormat;

/// To-do CLI: talks to todo-daemon over gRPC.
#[derive(Parser, Debug)]
#[command(name = "todo", version = "0.1.0", about = "Client for the to-do item service")]
struct Cli {
    /// gRPC endpoint of the todo-daemon.
    #[arg(long, global = true, default_value = "http://localhost:8080")]
    rpc: String,

    /// API version tag sent with every request.
    #[arg(long, global = true, default_value = "1")]
    api: String,

    /// Deadline for unary calls, in seconds.
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an item.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show one item.
    Get {
        #[arg(long)]
        id: String,
    },
    /// List every item.
    List,
    /// Overwrite an item's title and description.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete an item.
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Run Create, Read, ReadAll and Update against the server.
    Demo {
        /// Delete the demo item afterwards.
        #[arg(long)]
        delete: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut session = Session::connect(
        &cli.rpc,
        &cli.api,
        Duration::from_secs(cli.timeout_secs),
        cli.format,
    )
    .await?;

    match &cli.command {
        Commands::Create { title, description } => {
            let id = item::create(&mut session, title, description).await?;
            item::print_message(cli.format, "id", &id);
        }
        Commands::Get { id } => {
            let to_do = item::get(&mut session, id).await?;
            item::print_items(cli.format, &[to_do])?;
        }
        Commands::List => {
            let items = item::list(&mut session).await?;
            item::print_items(cli.format, &items)?;
        }
        Commands::Update {
            id,
            title,
            description,
        } => {
            let updated = item::update(&mut session, id, title, description).await?;
            item::print_message(cli.format, "updated", &updated);
        }
        Commands::Delete { id } => {
            let deleted = item::delete(&mut session, id).await?;
            item::print_message(cli.format, "deleted", &deleted);
        }
        Commands::Demo { delete } => demo::run(&mut session, *delete).await?,
    }

    Ok(())
}
