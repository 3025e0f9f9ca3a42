// crates/todo-cli/src/commands/mod.rs
//
// Command module declarations and the connection shared by every command.

pub mod demo;
pub mod item;

use std::time::Duration;

use tonic::transport::Channel;

use todo_rpc::ToDoServiceClient;

use crate::output::OutputFormat;

/// A connected client plus the per-invocation settings every command uses.
pub struct Session {
    pub client: ToDoServiceClient<Channel>,
    pub api: String,
    pub timeout: Duration,
    pub format: OutputFormat,
}

impl Session {
    /// Connect to the server at `endpoint`.
    pub async fn connect(
        endpoint: &str,
        api: &str,
        timeout: Duration,
        format: OutputFormat,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client = ToDoServiceClient::connect(endpoint.to_string()).await?;
        Ok(Self {
            client,
            api: api.to_string(),
            timeout,
            format,
        })
    }

    /// Wrap a message in a request carrying the unary-call deadline.
    pub fn request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        request.set_timeout(self.timeout);
        request
    }
}
