//! Scripted transport and fixtures shared by the scenario tests.
#![allow(dead_code)]

use async_trait::async_trait;
use capfront_application::CapfrontApp;
use capfront_core::config::ClientConfig;
use capfront_core::error::RemoteError;
use capfront_core::remote::{HttpTransport, Method, RawResponse, RemoteRequest};
use capfront_core::session::UserSession;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://mock.test/";

#[derive(Debug, Clone)]
enum Reply {
    Respond(u16, Vec<u8>),
    Unreachable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Answers by `(method, path)`. One-shot replies are consumed before the
/// standing reply; unknown routes get a 404.
#[derive(Default)]
pub struct MockTransport {
    standing: Mutex<HashMap<(String, String), Reply>>,
    queued: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn key(method: Method, path: &str) -> (String, String) {
    (method.as_str().to_string(), path.to_string())
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.standing.lock().unwrap().insert(
            key(method, path),
            Reply::Respond(status, body.into().into_bytes()),
        );
    }

    pub fn on_json(&self, method: Method, path: &str, body: Value) {
        self.on(method, path, 200, body.to_string());
    }

    pub fn once(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.queued
            .lock()
            .unwrap()
            .entry(key(method, path))
            .or_default()
            .push_back(Reply::Respond(status, body.into().into_bytes()));
    }

    pub fn unreachable(&self, method: Method, path: &str) {
        self.standing
            .lock()
            .unwrap()
            .insert(key(method, path), Reply::Unreachable);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: RemoteRequest) -> Result<RawResponse, RemoteError> {
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method,
            path: path.clone(),
            bearer: request.bearer.clone(),
            body: request.body.clone(),
        });

        let route = key(request.method, &path);
        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&route)
            .and_then(VecDeque::pop_front);
        let reply = queued.or_else(|| self.standing.lock().unwrap().get(&route).cloned());

        match reply {
            Some(Reply::Respond(status, body)) => Ok(RawResponse::new(status, body)),
            Some(Reply::Unreachable) => Err(RemoteError::Unreachable {
                url: request.url,
                message: "connection refused".to_string(),
            }),
            None => Ok(RawResponse::new(404, r#"{"detail":"Not Found"}"#)),
        }
    }
}

pub fn config() -> ClientConfig {
    ClientConfig {
        api_base_url: BASE_URL.to_string(),
        admin_password: Some("admin-secret".to_string()),
        ..ClientConfig::default()
    }
}

pub fn app(transport: &Arc<MockTransport>) -> CapfrontApp {
    CapfrontApp::new(transport.clone(), config())
}

pub fn app_with(transport: &Arc<MockTransport>, config: ClientConfig) -> CapfrontApp {
    CapfrontApp::new(transport.clone(), config)
}

/// Puts a logged-in session for `username` straight into the directory.
pub async fn seed_user(app: &CapfrontApp, username: &str, current_simulation: i64) {
    let mut session = UserSession::logged_in(username, format!("token-{}", username));
    session.current_simulation_id = current_simulation;
    app.directory.insert(session).await;
}

pub fn simulations(state: &str) -> Value {
    json!([
        {"id": 5, "name": "Simple", "state": state, "username": "alan", "user_id": 2},
        {"id": 7, "name": "Clone", "state": "DEMAND", "username": "alan", "user_id": 2}
    ])
}

pub fn commodities() -> Value {
    json!([
        {"id": 1, "name": "Means of Production", "simulation_id": 5, "size": 100.0},
        {"id": 2, "name": "Labour Power", "simulation_id": 5, "size": 50.0},
        {"id": 3, "name": "Consumption", "simulation_id": 5, "size": 20.0}
    ])
}

pub fn industries() -> Value {
    json!([
        {"id": 1, "name": "Means of Production", "simulation_id": 5, "output": "Means of Production"},
        {"id": 2, "name": "Consumption", "simulation_id": 5, "output": "Consumption"}
    ])
}

pub fn classes() -> Value {
    json!([
        {"id": 1, "name": "Capitalists", "simulation_id": 5},
        {"id": 2, "name": "Workers", "simulation_id": 5}
    ])
}

pub fn stocks() -> Value {
    json!([
        {"id": 1, "owner_id": 1, "owner_type": "Industry", "usage_type": "Production", "commodity_id": 2, "size": 10.0},
        {"id": 2, "owner_id": 1, "owner_type": "Industry", "usage_type": "Sales", "commodity_id": 1, "size": 4.0},
        {"id": 3, "owner_id": 2, "owner_type": "Class", "usage_type": "Consumption", "commodity_id": 3, "size": 2.0},
        {"id": 4, "owner_id": 99, "owner_type": "Industry", "usage_type": "Money", "commodity_id": 1, "size": 1.0}
    ])
}

pub fn traces() -> Value {
    json!([
        {"id": 1, "simulation_id": 5, "level": 1, "message": "Demand computed"}
    ])
}

/// Standing replies for every per-user dataset.
pub fn serve_user_tables(transport: &MockTransport, state: &str) {
    transport.on_json(Method::Get, "simulations/mine", simulations(state));
    transport.on_json(Method::Get, "commodities/", commodities());
    transport.on_json(Method::Get, "industries/", industries());
    transport.on_json(Method::Get, "classes/", classes());
    transport.on_json(Method::Get, "stocks/", stocks());
    transport.on_json(Method::Get, "trace/", traces());
}

pub fn serve_registry_tables(transport: &MockTransport) {
    transport.on_json(
        Method::Get,
        "simulations/templates",
        json!([{"id": 1, "name": "Simple two-industry", "state": "DEMAND"}]),
    );
    transport.on_json(
        Method::Get,
        "users/",
        json!([
            {"id": 1, "username": "admin", "is_superuser": true},
            {"id": 2, "username": "alan"},
            {"id": 3, "username": "bea"}
        ]),
    );
}
