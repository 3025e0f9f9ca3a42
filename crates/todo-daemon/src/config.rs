// crates/todo-daemon/src/config.rs
//
// Runtime configuration for the to-do daemon.
// Loaded from a TOML file or populated with defaults.

use serde::Deserialize;
use std::fs;

use todo_rpc::{GatewayConfig, RpcConfig};
use todo_store::MongoConfig;

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Host address for the gRPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the gRPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Host address for the HTTP/JSON gateway.
    #[serde(default = "default_gateway_host")]
    pub gateway_host: String,

    /// Port for the HTTP/JSON gateway.
    #[serde(default = "default_gateway_port")]
    pub gateway_port: u16,

    /// gRPC endpoint the gateway forwards to.
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Storage backend: "mongo" or "memory".
    #[serde(default = "default_storage")]
    pub storage: String,

    /// MongoDB connection string.
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    8080
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8081
}

fn default_upstream() -> String {
    "http://localhost:8080".to_string()
}

fn default_storage() -> String {
    "mongo".to_string()
}

fn default_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "mydb".to_string()
}

fn default_collection() -> String {
    "Todo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            gateway_host: default_gateway_host(),
            gateway_port: default_gateway_port(),
            upstream: default_upstream(),
            storage: default_storage(),
            mongodb_uri: default_mongodb_uri(),
            database: default_database(),
            collection: default_collection(),
            log_level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: DaemonConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
        }
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            host: self.gateway_host.clone(),
            port: self.gateway_port,
            upstream: self.upstream.clone(),
        }
    }

    pub fn mongo_config(&self) -> MongoConfig {
        MongoConfig {
            uri: self.mongodb_uri.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
        }
    }
}
