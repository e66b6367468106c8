//! In-process HTTP server with canned responses.
//!
//! Binds `127.0.0.1:0`, records every request and answers by method and
//! path. Unmatched requests get `404 {}`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::Value;
use tokio::task::JoinHandle;

/// Canned response for one method + path.
#[derive(Clone)]
pub struct MockResponse {
    pub method: Method,
    pub path: String,
    pub status: u16,
    pub body: Value,
}

impl MockResponse {
    pub fn new(method: Method, path: &str, status: u16, body: Value) -> Self {
        Self {
            method,
            path: path.to_owned(),
            status,
            body,
        }
    }
}

/// A request seen by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Value::Null` when empty or not JSON.
    pub body: Value,
}

#[derive(Clone)]
struct Shared {
    responses: Arc<Vec<MockResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockHttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

async fn respond(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let path = uri.path().to_owned();
    shared.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match shared
        .responses
        .iter()
        .find(|r| r.method == method && r.path == path)
    {
        Some(r) => (
            StatusCode::from_u16(r.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            axum::Json(r.body.clone()),
        ),
        None => (StatusCode::NOT_FOUND, axum::Json(serde_json::json!({}))),
    }
}

impl MockHttpServer {
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            responses: Arc::new(responses),
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(respond).with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock http server");
        let addr = listener.local_addr().expect("mock server address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock http server");
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Base URL without trailing slash, e.g. `http://127.0.0.1:41234`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
