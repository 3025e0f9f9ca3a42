// crates/todo-rpc/tests/gateway.rs
//
// HTTP/JSON gateway on an ephemeral port, in front of a real upstream server.

mod common;

use reqwest::header;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use todo_rpc::gateway::router;

use common::TestServer;

/// Base URL of a gateway forwarding to `server`.
async fn gateway(server: &TestServer) -> String {
    let app = router(server.client().await);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

async fn call(base: &str, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = reqwest::Client::new().request(method, format!("{}{}", base, path));
    if let Some(body) = body {
        request = request.json(&body);
    }
    let resp = request.send().await.unwrap();
    let status = resp.status();
    let bytes = resp.bytes().await.unwrap();
    (status, bytes.to_vec())
}

fn create_body(title: &str) -> Value {
    json!({
        "api": "1",
        "toDo": {
            "title": title,
            "description": "this is just a demo",
            "insertAt": "2024-03-09T12:30:45Z",
            "updateAt": "2024-03-09T12:30:45Z"
        }
    })
}

#[tokio::test]
async fn test_create_and_read_over_http() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    let (status, body) = call(&app, Method::POST, "/v1/todo", Some(create_body("demo task"))).await;
    assert_eq!(status, StatusCode::OK);
    let created: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(created["api"], "1");
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let (status, body) = call(&app, Method::GET, &format!("/v1/todo/{}?api=1", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let read: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(read["toDo"]["id"], id.as_str());
    assert_eq!(read["toDo"]["title"], "demo task");
    assert_eq!(read["toDo"]["insertAt"], "2024-03-09T12:30:45Z");
}

#[tokio::test]
async fn test_wrong_api_maps_to_bad_request() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    let mut body = create_body("t");
    body["api"] = json!("v2");
    let (status, body) = call(&app, Method::POST, "/v1/todo", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(err["code"], 3);
    assert!(err["message"].as_str().unwrap().contains("v2"));
    assert_eq!(err["details"], json!([]));
    assert!(server.store.is_empty());
}

#[tokio::test]
async fn test_invalid_json_is_rejected_before_upstream() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/v1/todo", app))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["code"], 3);
}

#[tokio::test]
async fn test_read_missing_item_is_not_found() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    let (status, _) = call(
        &app,
        Method::GET,
        "/v1/todo/507f1f77bcf86cd799439011?api=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_uses_path_id() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    let (_, body) = call(&app, Method::POST, "/v1/todo", Some(create_body("before"))).await;
    let id = serde_json::from_slice::<Value>(&body).unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let mut update = create_body("after");
    update["toDo"]["id"] = json!("ffffffffffffffffffffffff");
    let (status, body) = call(&app, Method::PUT, &format!("/v1/todo/{}", id), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    let resp: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp["updated"], format!("Successfully updated {}", id));

    let (_, body) = call(&app, Method::GET, &format!("/v1/todo/{}?api=1", id), None).await;
    let read: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(read["toDo"]["title"], "after");
}

#[tokio::test]
async fn test_delete_then_read() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    let (_, body) = call(&app, Method::POST, "/v1/todo", Some(create_body("doomed"))).await;
    let id = serde_json::from_slice::<Value>(&body).unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = call(&app, Method::DELETE, &format!("/v1/todo/{}?api=1", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let resp: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(resp["deleted"], format!("Successfully deleted {}", id));

    let (status, _) = call(&app, Method::GET, &format!("/v1/todo/{}?api=1", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_read_all_streams_ndjson() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    for title in ["one", "two", "three"] {
        call(&app, Method::POST, "/v1/todo", Some(create_body(title))).await;
    }

    let resp = reqwest::get(format!("{}/v1/todos?api=1", app)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/x-ndjson"
    );
    let text = resp.text().await.unwrap();
    let titles: Vec<String> = text
        .lines()
        .map(|line| {
            let v: Value = serde_json::from_str(line).unwrap();
            v["result"]["toDo"]["title"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_read_all_wrong_api() {
    let server = TestServer::start().await;
    let app = gateway(&server).await;

    let (status, _) = call(&app, Method::GET, "/v1/todos?api=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
