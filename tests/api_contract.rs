//! Exercises the API client against an in-process stub backend speaking the
//! documented HTTP contract.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use repolens::api::ApiClient;
use repolens::config::{Config, Endpoints};
use repolens::Error;

/// Request bodies seen by the stub, keyed by operation.
#[derive(Clone, Default)]
struct Recorded(Arc<Mutex<Vec<(String, Value)>>>);

impl Recorded {
    fn push(&self, op: &str, body: Value) {
        self.0.lock().unwrap().push((op.to_string(), body));
    }

    fn of(&self, op: &str) -> Vec<Value> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, _)| o == op)
            .map(|(_, b)| b.clone())
            .collect()
    }
}

async fn tree_handler() -> Json<Value> {
    Json(json!({"tree": ["src/", "src/main.py", "README.md"]}))
}

async fn source_handler() -> Json<Value> {
    Json(json!({"src": "github.com/example/repo"}))
}

async fn files_handler() -> Json<Value> {
    Json(json!({"files": [["a.py", "/repo/a.py"], ["b.py", "/repo/b.py"]]}))
}

async fn reset_handler() -> Json<Value> {
    Json(json!({"status": "reset"}))
}

async fn clone_handler(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.push("clone", body);
    Json(json!({"status": "cloning"}))
}

async fn show_code_handler(
    State(recorded): State<Recorded>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.push("show_code", body.clone());
    match body.get("dir").and_then(Value::as_str) {
        Some(dir) => Json(json!({"fileText": format!("# contents of {dir}")})),
        None => Json(json!({"fileText": ""})),
    }
}

async fn chat_handler(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body.get("question").and_then(Value::as_str) {
        Some("boom") => (StatusCode::BAD_REQUEST, Json(json!({"detail": "bad input"}))),
        Some("opaque") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        _ => (StatusCode::OK, Json(json!({"answer": "x", "source": "y"}))),
    }
}

async fn spawn_stub() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/tree_structure", get(tree_handler))
        .route("/api/source", get(source_handler))
        .route("/api/list_files", get(files_handler))
        .route("/api/reset_memory", get(reset_handler))
        .route("/api/clone_repos", post(clone_handler))
        .route("/api/show_code", post(show_code_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorded)
}

fn client(base_url: &str) -> ApiClient {
    let config = Config {
        base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
    };
    ApiClient::new(Endpoints::new(&config), config.request_timeout).unwrap()
}

#[tokio::test]
async fn read_operations_decode_typed_bodies() {
    let (base_url, _) = spawn_stub().await;
    let api = client(&base_url);

    assert_eq!(
        api.tree_structure().await.unwrap(),
        ["src/", "src/main.py", "README.md"]
    );
    assert_eq!(api.source().await.unwrap(), "github.com/example/repo");

    let files = api.list_files().await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].name, "b.py");
    assert_eq!(files[1].path, "/repo/b.py");

    let body = api.reset_memory().await.unwrap();
    assert_eq!(body, json!({"status": "reset"}));
}

#[tokio::test]
async fn show_code_sends_resolved_path_or_null() {
    let (base_url, recorded) = spawn_stub().await;
    let api = client(&base_url);

    let text = api.show_code(Some("/repo/b.py")).await.unwrap();
    assert_eq!(text, "# contents of /repo/b.py");

    let text = api.show_code(None).await.unwrap();
    assert_eq!(text, "");

    let payloads = recorded.of("show_code");
    assert_eq!(payloads[0], json!({"dir": "/repo/b.py"}));
    assert_eq!(payloads[1], json!({"dir": null}));
}

#[tokio::test]
async fn chat_maps_status_and_detail() {
    let (base_url, _) = spawn_stub().await;
    let api = client(&base_url);

    let reply = api.chat("what does main do?").await.unwrap();
    assert_eq!(reply.answer, "x");
    assert_eq!(reply.source, "y");

    match api.chat("boom").await.unwrap_err() {
        Error::Api { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail.as_deref(), Some("bad input"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = api.chat("opaque").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Api {
            status: 500,
            detail: None
        }
    ));
}

#[tokio::test]
async fn clone_requests_are_never_deduplicated() {
    let (base_url, recorded) = spawn_stub().await;
    let api = client(&base_url);

    let url = "https://github.com/example/repo";
    api.clone_repo(url).await.unwrap();
    api.clone_repo(url).await.unwrap();

    let payloads = recorded.of("clone");
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], json!({"url": url}));
    assert_eq!(payloads[1], json!({"url": url}));
}

#[tokio::test]
async fn malformed_body_fails_closed() {
    let app = Router::new().route(
        "/api/tree_structure",
        get(|| async { Json(json!({"trees": []})) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = client(&format!("http://{addr}"));
    let err = api.tree_structure().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
