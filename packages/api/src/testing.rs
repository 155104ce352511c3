//! Scripted in-memory transport for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RecordedCall {
    pub route: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<Result<ApiResponse, ApiError>>>,
    calls: Vec<RecordedCall>,
}

/// Replies are queued per route (`"GET /notes"`) and consumed in order.
/// An unscripted route answers `500`.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, route: &str, status: u16, body: Value) {
        self.push(route, Ok(ApiResponse { status, body }));
    }

    pub fn fail(&self, route: &str, error: ApiError) {
        self.push(route, Err(error));
    }

    fn push(&self, route: &str, reply: Result<ApiResponse, ApiError>) {
        self.script
            .lock()
            .unwrap()
            .replies
            .entry(route.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn count(&self, route: &str) -> usize {
        self.calls().iter().filter(|c| c.route == route).count()
    }

    pub fn last(&self, route: &str) -> Option<RecordedCall> {
        self.calls().into_iter().filter(|c| c.route == route).last()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse, ApiError> {
        let route = request.route();
        let mut script = self.script.lock().unwrap();
        script.calls.push(RecordedCall {
            route: route.clone(),
            bearer: bearer.map(str::to_owned),
            body: request.body.clone(),
        });
        script
            .replies
            .get_mut(&route)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Ok(ApiResponse {
                    status: 500,
                    body: json!({ "message": format!("no scripted reply for {route}") }),
                })
            })
    }
}
