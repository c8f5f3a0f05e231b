#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use agent_gateway_lib::models::AppConfig;
use agent_gateway_lib::modules::ShareStore;
use agent_gateway_lib::proxy::{build_router, AppState};
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A request as the mock backend saw it
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().expect("recorder lock").clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().expect("recorder lock").len()
    }

    pub async fn capture(&self, request: Request) -> Captured {
        let (parts, body) = request.into_parts();
        let body = to_bytes(body, usize::MAX).await.expect("read mock body");
        let captured = Captured {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body: body.to_vec(),
        };
        self.requests
            .lock()
            .expect("recorder lock")
            .push(captured.clone());
        captured
    }
}

pub struct MockServer {
    pub base_url: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}

pub async fn spawn_mock_server(app: Router) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server listener");
    let address: SocketAddr = listener.local_addr().expect("mock listener local addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        server.await.expect("run mock server");
    });
    MockServer {
        base_url: format!("http://{address}"),
        shutdown_tx: Some(shutdown_tx),
        handle,
    }
}

/// Agent server stand-in: records every request and answers by path
pub async fn spawn_mock_backend() -> (MockServer, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .fallback(backend_reply)
        .with_state(recorder.clone());
    (spawn_mock_server(app).await, recorder)
}

async fn backend_reply(State(recorder): State<Recorder>, request: Request) -> Response {
    let captured = recorder.capture(request).await;
    match captured.path.as_str() {
        "/threads/abc123/runs" => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"run_id":"r1"}"#,
        )
            .into_response(),
        "/overloaded" => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "backend overloaded",
        )
            .into_response(),
        "/invalid" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            [(header::CONTENT_TYPE, "application/json")],
            "{\"detail\" :  [\"bad input\"]\n}",
        )
            .into_response(),
        "/no-content-type" => Response::builder()
            .status(StatusCode::OK)
            .body(Body::from("plain bytes"))
            .expect("build raw response"),
        "/cors-override" => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "https://backend-only.example"),
            ],
            "{}",
        )
            .into_response(),
        _ => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"ok":true}"#,
        )
            .into_response(),
    }
}

pub fn config_for(backend_url: &str) -> AppConfig {
    let mut config = AppConfig::new();
    config.proxy.backend_url = backend_url.to_string();
    config.proxy.request_timeout = 5;
    config
}

pub fn state_for(config: &AppConfig) -> (AppState, Arc<ShareStore>) {
    let store = Arc::new(ShareStore::open_in_memory().expect("open share store"));
    let state = AppState::from_config(config, store.clone()).expect("build app state");
    (state, store)
}

pub fn gateway_for(backend_url: &str) -> Router {
    let (state, _) = state_for(&config_for(backend_url));
    build_router(state)
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body is JSON")
}

pub fn assert_cors(headers: &HeaderMap) {
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
}
