// In-process stand-in for the upstream API, shared by gateway and route tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::llm_client::{CompletionRequest, CompletionTransport, LlmError, RawResponse};

pub struct FakeTransport {
    response: RawResponse,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, CompletionRequest)>>,
}

impl FakeTransport {
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            response: RawResponse {
                status,
                body: body.into(),
            },
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A 200 whose first choice carries `content`.
    pub fn replying_with(content: &str) -> Self {
        let body = json!({ "choices": [{ "message": { "content": content } }] });
        Self::with_status(200, body.to_string())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        let requests = self.requests.lock().unwrap();
        requests.last().map(|(_, request)| request.clone())
    }

    pub fn last_api_key(&self) -> Option<String> {
        let requests = self.requests.lock().unwrap();
        requests.last().map(|(key, _)| key.clone())
    }
}

#[async_trait]
impl CompletionTransport for FakeTransport {
    async fn send(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<RawResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        Ok(self.response.clone())
    }
}
