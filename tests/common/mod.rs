#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use interview_coach::error::GatewayError;
use interview_coach::services::gateway::{AiGateway, OutputMode, Payload};
use serde_json::{json, Value as JsonValue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{oneshot, Semaphore};
use tower::ServiceExt;

/// Answers every prompt with a canned reply chosen from the prompt's shape.
/// Calls can be held, in arrival order, until released.
pub struct ScriptedGateway {
    calls: AtomicUsize,
    failure: Option<GatewayError>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    started: Semaphore,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: None,
            gates: Mutex::new(VecDeque::new()),
            started: Semaphore::new(0),
        }
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Holds the next unheld call until the returned sender fires or is dropped.
    pub fn hold_next_call(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Resolves once one more held call has reached the gateway.
    pub async fn held_call_started(&self) {
        self.started.acquire().await.unwrap().forget();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiGateway for ScriptedGateway {
    async fn invoke(&self, prompt: &str, mode: &OutputMode) -> Result<Payload, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(rx) = gate {
            self.started.add_permits(1);
            let _ = rx.await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(scripted_reply(prompt, mode))
    }
}

fn scripted_reply(prompt: &str, mode: &OutputMode) -> Payload {
    if prompt.starts_with("Generate ") {
        return Payload::Json(question_batch());
    }
    if matches!(mode, OutputMode::StructuredJson { .. }) {
        return Payload::Json(json!({ "feedback": "Clear and accurate.", "score": 8 }));
    }
    if prompt.contains("model answer") {
        return Payload::Text("A concise model answer.".to_string());
    }
    if prompt.starts_with("Based on") {
        return Payload::Text("Overall a strong session.".to_string());
    }
    let code = prompt
        .split("```")
        .nth(1)
        .and_then(|fenced| fenced.lines().nth(1))
        .unwrap_or_default();
    Payload::Text(format!("Explanation of {}", code))
}

/// Five open-ended questions followed by five MCQs.
pub fn question_batch() -> JsonValue {
    let mut items: Vec<JsonValue> = (1..=5)
        .map(|i| json!({ "type": "open-ended", "question": format!("Open question {}", i) }))
        .collect();
    items.extend((1..=5).map(|i| {
        json!({
            "type": "mcq",
            "question": format!("Choice question {}", i),
            "options": ["alpha", "beta", "gamma", "delta"],
            "correctAnswer": "gamma"
        })
    }));
    JsonValue::Array(items)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
