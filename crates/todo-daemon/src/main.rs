// crates/todo-daemon/src/main.rs
//
// Binary entrypoint for the to-do daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing,
// constructs the store, and runs the gRPC server, the HTTP/JSON gateway,
// or both until Ctrl-C.

mod config;

use std::future::Future;
use std::sync::Arc;

use clap::Parser;
use config::DaemonConfig;
use tokio::sync::watch;

use todo_core::TodoStore;
use todo_rpc::{gateway, TodoRpcServer};
use todo_store::{InMemoryStore, MongoStore};

/// To-do daemon: serves the gRPC API and/or its HTTP/JSON gateway.
#[derive(Parser, Debug)]
#[command(name = "todo-daemon", version = "0.1.0", about = "To-do item service daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "todo.toml")]
    config: String,

    /// What to run: server, gateway, or all.
    #[arg(long, default_value = "all")]
    mode: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load before tracing is up so the configured level can seed the filter;
    // the outcome is logged right after.
    let loaded = DaemonConfig::load(&args.config);
    let log_level = loaded
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    let daemon_config = match loaded {
        Ok(cfg) => {
            tracing::info!("Loaded configuration from {}", args.config);
            cfg
        }
        Err(e) => {
            tracing::warn!(
                "Could not load config from {}: {}. Using defaults.",
                args.config,
                e
            );
            DaemonConfig::default()
        }
    };

    let (run_server, run_gateway) = match args.mode.as_str() {
        "server" => (true, false),
        "gateway" => (false, true),
        "all" => (true, true),
        other => {
            tracing::error!("Unknown mode: {}. Use 'server', 'gateway', or 'all'.", other);
            return Err(format!("unknown mode {:?}", other).into());
        }
    };

    tracing::info!("To-do daemon v0.1.0");
    tracing::info!("Mode: {}", args.mode);

    // Ctrl-C flips the watch; every front end waits on its own receiver.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Stopping the server..."),
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
        let _ = shutdown_tx.send(true);
    });

    let mut tasks = Vec::new();

    if run_server {
        let store = build_store(&daemon_config).await?;
        tracing::info!(
            "RPC endpoint: {}:{}",
            daemon_config.rpc_host,
            daemon_config.rpc_port
        );
        let rpc_server = TodoRpcServer::new(daemon_config.rpc_config(), store);
        let signal = shutdown_signal(shutdown_rx.clone());
        tasks.push(tokio::spawn(async move {
            if let Err(e) = rpc_server.serve_with_shutdown(signal).await {
                tracing::error!("RPC server error: {}", e);
            }
        }));
    }

    if run_gateway {
        tracing::info!(
            "Gateway endpoint: {}:{} -> {}",
            daemon_config.gateway_host,
            daemon_config.gateway_port,
            daemon_config.upstream
        );
        let gateway_config = daemon_config.gateway_config();
        let signal = shutdown_signal(shutdown_rx.clone());
        tasks.push(tokio::spawn(async move {
            if let Err(e) = gateway::serve(gateway_config, signal).await {
                tracing::error!("Gateway error: {}", e);
            }
        }));
    }

    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!("Task failed: {}", e);
        }
    }

    tracing::info!("Done");
    Ok(())
}

/// Construct the configured storage backend.
async fn build_store(
    config: &DaemonConfig,
) -> Result<Arc<dyn TodoStore>, Box<dyn std::error::Error>> {
    match config.storage.as_str() {
        "mongo" => {
            tracing::info!(
                "Connecting to MongoDB at {} ({}.{})",
                config.mongodb_uri,
                config.database,
                config.collection
            );
            let store = MongoStore::connect(&config.mongo_config()).await?;
            store.ping().await?;
            tracing::info!("Connected to MongoDB");
            Ok(Arc::new(store))
        }
        "memory" => {
            tracing::warn!("Using in-memory storage; items are lost on exit");
            Ok(Arc::new(InMemoryStore::new()))
        }
        other => Err(format!("unknown storage backend {:?}; use 'mongo' or 'memory'", other).into()),
    }
}

/// Resolves once the shutdown flag is raised or its sender is gone.
fn shutdown_signal(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.wait_for(|stop| *stop).await;
    }
}
