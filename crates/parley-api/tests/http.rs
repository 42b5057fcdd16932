//! Router tests: drive the HTTP surface with in-process requests against a
//! canned model gateway and a history file in a temp directory.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use parley_api::http::handlers::gemini::CHAT_CREATED_MESSAGE;
use parley_api::http::router::build_router;
use parley_api::state::AppState;
use parley_core::chat::session::SessionController;
use parley_core::chat::store::ChatStore;
use parley_core::llm::box_gateway::BoxModelGateway;
use parley_core::llm::gateway::ModelGateway;
use parley_infra::filesystem::JsonFileStore;
use parley_types::chat::{Chat, Message};
use parley_types::config::AppConfig;
use parley_types::llm::GatewayError;

enum Canned {
    Reply(&'static str),
    Fail(GatewayError),
    Hang,
}

/// Answers from a fixed queue; counts calls.
#[derive(Clone, Default)]
struct CannedGateway {
    queue: Arc<Mutex<VecDeque<Canned>>>,
    calls: Arc<Mutex<usize>>,
}

impl CannedGateway {
    fn with(items: Vec<Canned>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(items.into())),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl ModelGateway for CannedGateway {
    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned-1"
    }

    async fn generate(&self, _contents: &[Message]) -> Result<String, GatewayError> {
        *self.calls.lock().unwrap() += 1;
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(Canned::Reply(text)) => Ok(text.to_string()),
            Some(Canned::Fail(err)) => Err(err),
            Some(Canned::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GatewayError::EmptyResponse)
            }
            None => Err(GatewayError::EmptyResponse),
        }
    }
}

struct Harness {
    router: Router,
    state: AppState,
    _dir: TempDir,
}

async fn harness_with(gateway: CannedGateway, seed: &[&str], timeout: Duration) -> Harness {
    let dir = TempDir::new().unwrap();
    let file = JsonFileStore::new(dir.path().join("history.json"));

    let mut store = ChatStore::new();
    for id in seed {
        let mut chat = Chat::with_id(*id);
        chat.push(Message::user("earlier question"));
        chat.push(Message::model("earlier answer"));
        chat.summary = format!("Chat {id}");
        store.add(chat);
    }
    store.save_all(&file).await.unwrap();

    let controller = SessionController::open(BoxModelGateway::new(gateway), file, timeout)
        .await
        .unwrap();
    let state = AppState::new(controller, dir.path().to_path_buf(), AppConfig::default());
    Harness {
        router: build_router(state.clone()),
        state,
        _dir: dir,
    }
}

async fn harness(gateway: CannedGateway, seed: &[&str]) -> Harness {
    harness_with(gateway, seed, Duration::from_secs(5)).await
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn request_returns_trimmed_reply() {
    let gateway = CannedGateway::with(vec![Canned::Reply("Hello! How can I help?\n")]);
    let h = harness(gateway, &[]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/request", Some(json!({"prompt": "hi"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Hello! How can I help?"));

    let controller = h.state.controller.lock().await;
    let chat = controller.store().get(controller.current_session_id()).unwrap();
    assert_eq!(chat.history.len(), 2);
}

#[tokio::test]
async fn request_with_empty_prompt_is_bad_request() {
    let gateway = CannedGateway::default();
    let h = harness(gateway.clone(), &[]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/request", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Message cannot be empty"));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn request_gateway_failure_is_server_error() {
    let gateway = CannedGateway::with(vec![Canned::Fail(GatewayError::AuthenticationFailed)]);
    let h = harness(gateway, &[]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/request", Some(json!({"prompt": "hi"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.as_str().unwrap().contains("authentication failed"));
}

#[tokio::test]
async fn request_timeout_is_gateway_timeout() {
    let gateway = CannedGateway::with(vec![Canned::Hang]);
    let h = harness_with(gateway, &[], Duration::from_millis(50)).await;

    let (status, _) = call(&h.router, Method::POST, "/api/gemini/request", Some(json!({"prompt": "hi"}))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn new_chat_rotates_and_persists_summary() {
    let gateway = CannedGateway::with(vec![
        Canned::Reply("Hi there"),
        Canned::Reply("Friendly Greeting\n"),
    ]);
    let h = harness(gateway, &[]).await;

    let (_, first_id) = call(&h.router, Method::GET, "/api/gemini/current_session_id", None).await;
    call(&h.router, Method::POST, "/api/gemini/request", Some(json!({"prompt": "hi"}))).await;

    let (status, new_id) = call(&h.router, Method::POST, "/api/gemini/new_chat", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(new_id, first_id);

    let (_, current) = call(&h.router, Method::GET, "/api/gemini/current_session_id", None).await;
    assert_eq!(current, new_id);

    let raw = std::fs::read_to_string(h.state.data_dir.join("history.json")).unwrap();
    assert!(raw.contains("Friendly Greeting"));

    let (_, summaries) = call(&h.router, Method::GET, "/api/gemini/all_chat_summaries", None).await;
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["sessionId"], first_id);
    assert_eq!(summaries[0]["summary"], "Friendly Greeting");
    assert!(summaries[0].get("history").is_none());
}

#[tokio::test]
async fn new_chat_on_empty_chat_keeps_id() {
    let gateway = CannedGateway::default();
    let h = harness(gateway.clone(), &[]).await;

    let (_, before) = call(&h.router, Method::GET, "/api/gemini/current_session_id", None).await;
    let (status, after) = call(&h.router, Method::POST, "/api/gemini/new_chat", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(before, after);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn load_chat_returns_stored_chat() {
    let h = harness(CannedGateway::default(), &["saved"]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/load_chat", Some(json!({"sessionId": "saved"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], "saved");
    assert_eq!(body["summary"], "Chat saved");
    assert_eq!(body["history"][0], json!({"role": "user", "parts": ["earlier question"]}));

    let (_, current) = call(&h.router, Method::GET, "/api/gemini/current_session_id", None).await;
    assert_eq!(current, json!("saved"));
}

#[tokio::test]
async fn load_unknown_chat_is_not_found_but_becomes_current() {
    let h = harness(CannedGateway::default(), &[]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/load_chat", Some(json!({"sessionId": "unknown-id"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!(CHAT_CREATED_MESSAGE));
    let (_, current) = call(&h.router, Method::GET, "/api/gemini/current_session_id", None).await;
    assert_eq!(current, json!("unknown-id"));
}

#[tokio::test]
async fn load_chat_without_id_is_bad_request() {
    let h = harness(CannedGateway::default(), &[]).await;
    let (status, body) = call(&h.router, Method::POST, "/api/gemini/load_chat", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Session ID is required"));
}

#[tokio::test]
async fn delete_chats_all_present() {
    let h = harness(CannedGateway::default(), &["a", "b"]).await;

    let (status, body) = call(&h.router, Method::DELETE, "/api/gemini/delete_chats", Some(json!({"sessionIds": ["a", "b"]}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["a", "b"]));
    let (_, summaries) = call(&h.router, Method::GET, "/api/gemini/all_chat_summaries", None).await;
    assert_eq!(summaries, json!([]));
}

#[tokio::test]
async fn delete_chats_partial_is_not_found() {
    let h = harness(CannedGateway::default(), &["a", "b"]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/delete_chats", Some(json!({"sessionIds": ["a", "missing"]}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!(["a"]));
    let raw = std::fs::read_to_string(h.state.data_dir.join("history.json")).unwrap();
    assert!(!raw.contains("\"a\""));
    assert!(raw.contains("\"b\""));
}

#[tokio::test]
async fn delete_chats_without_ids_is_bad_request() {
    let h = harness(CannedGateway::default(), &["a"]).await;
    let (status, body) = call(&h.router, Method::POST, "/api/gemini/delete_chats", Some(json!({"sessionIds": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Session IDs are required"));
}

#[tokio::test]
async fn health_reports_ok() {
    let h = harness(CannedGateway::default(), &[]).await;
    let (status, body) = call(&h.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn null_fields_are_bad_request() {
    let gateway = CannedGateway::default();
    let h = harness(gateway.clone(), &["a"]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/request", Some(json!({"prompt": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Message cannot be empty"));

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/load_chat", Some(json!({"sessionId": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Session ID is required"));

    let (status, body) = call(&h.router, Method::DELETE, "/api/gemini/delete_chats", Some(json!({"sessionIds": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Session IDs are required"));

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn mistyped_body_is_bad_request_with_json_message() {
    let h = harness(CannedGateway::default(), &[]).await;

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/request", Some(json!({"prompt": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.as_str().unwrap().contains("prompt"));

    let (status, body) = call(&h.router, Method::POST, "/api/gemini/delete_chats", Some(json!({"sessionIds": "a"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_string());
}
