//! Test utilities: an in-process mock of the skilins REST API.
//!
//! The mock records every request and answers from canned responses or from
//! simple in-memory collections, so hooks and forms can be exercised end to
//! end without a real server.

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::config::ApiConfig;

/// A request as the mock server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub cookie: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn is_multipart(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    }

    /// Value of a multipart text field
    pub fn multipart_text(&self, name: &str) -> Option<String> {
        let body = String::from_utf8_lossy(&self.body);
        let marker = format!("name=\"{}\"\r\n\r\n", name);
        let start = body.find(&marker)? + marker.len();
        let rest = &body[start..];
        let end = rest.find("\r\n--")?;
        Some(rest[..end].to_string())
    }

    /// Whether a multipart file part with this field name was sent
    pub fn has_file_part(&self, name: &str) -> bool {
        let body = String::from_utf8_lossy(&self.body);
        body.contains(&format!("name=\"{}\"; filename=", name))
    }
}

#[derive(Default)]
struct MockState {
    responses: HashMap<(String, String), (u16, Value)>,
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    delay: Duration,
}

type Shared = Arc<Mutex<MockState>>;

const ANY: &str = "*";

pub struct MockApi {
    state: Shared,
    base_url: String,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Start the mock on an ephemeral local port
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock api");
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
            server,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_seconds: 5,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.api_config()).expect("mock api client")
    }

    /// Answer GET `path` with 200 and `body`
    pub fn set(&self, path: &str, body: Value) {
        self.respond("GET", path, 200, body);
    }

    /// Answer any method on `path` with `status` and `body`
    pub fn fail(&self, path: &str, status: u16, body: Value) {
        self.respond(ANY, path, status, body);
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.lock()
            .responses
            .insert((method.to_string(), path.to_string()), (status, body));
    }

    /// Serve `path` as a collection supporting list, get, create, update and delete
    pub fn collection(&self, path: &str, items: Vec<Value>) {
        self.lock().collections.insert(path.to_string(), items);
    }

    /// Delay every response, to keep requests in flight
    pub fn delay(&self, delay: Duration) {
        self.lock().delay = delay;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests seen for `method` and `path`
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Number of requests that were not GETs
    pub fn write_count(&self) -> usize {
        self.lock().requests.iter().filter(|r| r.method != "GET").count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(State(state): State<Shared>, request: Request) -> Response {
    let method = request.method().as_str().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let (cookie, content_type) = {
        let header_text = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        (header_text(header::COOKIE), header_text(header::CONTENT_TYPE))
    };
    let body = to_bytes(request.into_body(), usize::MAX)
        .await
        .map(|b| b.to_vec())
        .unwrap_or_default();

    let recorded = RecordedRequest {
        method,
        path,
        cookie,
        content_type,
        body,
    };

    let delay = {
        let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
        state.requests.push(recorded.clone());
        state.delay
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
    let (status, body) = answer(&mut state, &recorded);
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

fn answer(state: &mut MockState, request: &RecordedRequest) -> (u16, Value) {
    for method in [request.method.as_str(), ANY] {
        if let Some(canned) = state.responses.get(&(method.to_string(), request.path.clone())) {
            return canned.clone();
        }
    }

    let path = request.path.split('?').next().unwrap_or_default();
    if let Some(items) = state.collections.get_mut(path) {
        return match request.method.as_str() {
            "GET" => (200, json!({ "data": items })),
            "POST" => {
                let mut item = request.json();
                if item.get("uuid").is_none() {
                    item["uuid"] = json!(uuid::Uuid::new_v4().to_string());
                }
                items.push(item.clone());
                (201, json!({ "data": item, "message": "Created successfully" }))
            }
            _ => (405, json!({ "message": "Method not allowed" })),
        };
    }

    if let Some((collection, id)) = path.rsplit_once('/') {
        let matches = |item: &Value| item["uuid"] == id || item["slug"] == id;
        if let Some(items) = state.collections.get_mut(collection) {
            let position = items.iter().position(matches);
            return match (request.method.as_str(), position) {
                ("GET", Some(i)) => (200, json!({ "data": items[i] })),
                ("PATCH", Some(i)) => {
                    if let (Some(target), Value::Object(changes)) =
                        (items[i].as_object_mut(), request.json())
                    {
                        target.extend(changes);
                    }
                    (200, json!({ "data": items[i], "message": "Updated successfully" }))
                }
                ("DELETE", Some(i)) => {
                    items.remove(i);
                    (200, json!({ "message": "Delete successful" }))
                }
                _ => (404, json!({ "message": "Resource not found", "error": "Not Found" })),
            };
        }
    }

    (404, json!({ "error": "Not Found" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WriteRequest;

    #[tokio::test]
    async fn test_records_headers_and_body() {
        let api = MockApi::start().await;
        api.collection("/tags", Vec::new());
        let client = api.client().with_cookie(Some("userRole=staff".to_string()));

        let request = WriteRequest::post_json("/tags", &json!({ "name": "puisi" })).unwrap();
        let body = client.send(&request).await.unwrap();
        assert_eq!(body["message"], "Created successfully");

        let seen = api.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].cookie.as_deref(), Some("userRole=staff"));
        assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(seen[0].json()["name"], "puisi");
    }
}
