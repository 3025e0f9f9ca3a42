// crates/todo-rpc/tests/common/mod.rs
//
// Shared harness: a real tonic server on an ephemeral port over an
// in-memory store.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::transport::Channel;

use todo_rpc::convert::timestamp_from_datetime;
use todo_rpc::proto::ToDo;
use todo_rpc::{RpcConfig, ToDoServiceClient, TodoRpcServer};
use todo_store::InMemoryStore;

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<InMemoryStore>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let server = TodoRpcServer::new(RpcConfig::default(), store.clone());
        tokio::spawn(async move {
            let signal = async {
                let _ = rx.await;
            };
            if let Err(e) = server.serve_with_listener(listener, signal).await {
                eprintln!("test server failed: {}", e);
            }
        });

        Self {
            addr,
            store,
            shutdown: Some(tx),
        }
    }

    pub async fn client(&self) -> ToDoServiceClient<Channel> {
        ToDoServiceClient::connect(format!("http://{}", self.addr))
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn to_do(title: &str, description: &str, insert_at: i64, update_at: i64) -> ToDo {
    ToDo {
        id: String::new(),
        title: title.to_string(),
        description: description.to_string(),
        insert_at: Some(timestamp_from_datetime(&at(insert_at))),
        update_at: Some(timestamp_from_datetime(&at(update_at))),
    }
}
