use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::transport::traits::{Request, Response, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Respond(Response),
    Unreachable(String),
}

/// Scripted transport for tests. Replies are consumed in order; once the
/// script runs out every request gets `200 {}`.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: Response) -> &Self {
        self.replies.lock().push_back(Reply::Respond(response));
        self
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.respond(Response::json(status, &body))
    }

    /// The next request fails as if the service could not be reached.
    pub fn unreachable(&self, message: impl Into<String>) -> &Self {
        self.replies.lock().push_back(Reply::Unreachable(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// `path?query` of every request seen so far, in order.
    pub fn targets(&self) -> Vec<String> {
        self.requests.lock().iter().map(Request::target).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        self.requests.lock().push(request);
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Unreachable(message)) => Err(anyhow!(message)),
            None => Ok(Response::new(200, "{}")),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
