//! Scripted [`Transport`] for service tests.
//!
//! Responses are queued per `"METHOD path"` key and every call is recorded,
//! so tests can assert on what was (or was not) sent.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::{ApiError, RequestOptions, Transport};

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub options: RequestOptions,
}

#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, ApiError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for the next matching call.
    pub fn respond(&self, method: Method, path: &str, value: Value) {
        self.enqueue(method, path, Ok(value));
    }

    /// Queue a failure for the next matching call.
    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.enqueue(method, path, Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn enqueue(&self, method: Method, path: &str, result: Result<Value, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(key(&method, path))
            .or_default()
            .push_back(result);
    }
}

fn key(method: &Method, path: &str) -> String {
    format!("{method} {path}")
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let scripted = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&key(&method, path))
            .and_then(VecDeque::pop_front);

        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_owned(),
            options,
        });

        scripted.unwrap_or_else(|| {
            Err(ApiError::Http {
                status: 404,
                message: "Erro 404: Not Found".to_owned(),
            })
        })
    }
}
