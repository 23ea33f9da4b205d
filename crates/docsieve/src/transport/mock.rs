//! Scripted in-memory transport for unit tests

use super::{Session, Transport, TransportError};
use crate::types::ToolResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    replies: VecDeque<Result<ToolResult, TransportError>>,
    calls: Vec<(String, Value)>,
    connects: usize,
    closes: usize,
}

/// Replays queued replies, one per tool call, and records what it saw
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(self, text: &str) -> Self {
        self.reply(Ok(ToolResult::text(text)))
    }

    pub(crate) fn fail(self, err: TransportError) -> Self {
        self.reply(Err(err))
    }

    pub(crate) fn reply(self, reply: Result<ToolResult, TransportError>) -> Self {
        self.state.lock().unwrap().replies.push_back(reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub(crate) fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn connect(&self) -> Result<Box<dyn Session>, TransportError> {
        self.state.lock().unwrap().connects += 1;
        Ok(Box::new(MockSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockSession {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl Session for MockSession {
    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((name.to_string(), arguments));
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Protocol("no scripted reply".into())))
    }

    async fn close(&mut self) {
        self.state.lock().unwrap().closes += 1;
    }
}
