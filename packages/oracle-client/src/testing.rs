//! Scripted backend for tests.
//!
//! Responses are returned in the order they were queued; once the queue is
//! empty every call fails with an API error so a runaway loop surfaces
//! instead of hanging.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::CompletionBackend;
use crate::error::{OracleError, Result};
use crate::types::CompletionRequest;

enum Scripted {
    Json(Value),
    Error(OracleError),
}

/// A mock backend that replays queued answers and records requests.
#[derive(Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON answer.
    pub fn with_response(self, value: Value) -> Self {
        self.push_response(value);
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: OracleError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Error(error));
        self
    }

    /// Queue a JSON answer on a shared mock.
    pub fn push_response(&self, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Json(value));
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete_json(&self, request: &CompletionRequest, _schema: &Value) -> Result<Value> {
        self.calls.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Scripted::Json(value)) => Ok(value),
            Some(Scripted::Error(error)) => Err(error),
            None => Err(OracleError::Api("mock backend has no scripted response".into())),
        }
    }
}
