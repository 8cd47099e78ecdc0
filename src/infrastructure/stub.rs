use crate::domain::ports::{RawResponse, Transport};
use crate::domain::request::HttpRequestSpec;
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Reply = Result<RawResponse, TransportError>;

#[derive(Default)]
struct StubState {
    queued: VecDeque<Reply>,
    fallback: Option<Reply>,
    requests: Vec<HttpRequestSpec>,
}

/// A transport that never touches the network.
///
/// Replies come from a one-shot queue first, then from a fallback reply repeated for every
/// later call. Every request is recorded. `Clone` shares the same state, so a test can keep
/// a handle while the facade owns another.
#[derive(Default, Clone)]
pub struct StubTransport {
    state: Arc<Mutex<StubState>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every call with `response` unless a queued reply is pending.
    pub fn respond(&self, response: RawResponse) {
        self.lock().fallback = Some(Ok(response));
    }

    /// Fails every call with `fault` unless a queued reply is pending.
    pub fn fail(&self, fault: TransportError) {
        self.lock().fallback = Some(Err(fault));
    }

    /// Queues a reply for the next call only.
    pub fn enqueue(&self, reply: Result<RawResponse, TransportError>) {
        self.lock().queued.push_back(reply);
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequestSpec> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: &HttpRequestSpec) -> Reply {
        let mut state = self.lock();
        state.requests.push(request.clone());
        match state.queued.pop_front() {
            Some(reply) => reply,
            None => state.fallback.clone().unwrap_or_else(|| {
                Err(TransportError::Connect(format!(
                    "no stubbed reply for {}",
                    request.url
                )))
            }),
        }
    }
}
