use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::ToolTransport;
use crate::errors::{LyricsError, LyricsResult};
use crate::models::content::Content;

/// A mock transport that replays pre-configured blocks per tool and records calls
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, LyricsResult<Vec<Content>>>,
    pub calls: Arc<Mutex<Vec<(String, Map<String, Value>)>>>,
    pub closes: Arc<Mutex<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `tool` with one text block per JSON value
    pub fn with_json(mut self, tool: &str, blocks: Vec<Value>) -> Self {
        let content = blocks
            .into_iter()
            .map(|value| Content::text(value.to_string()))
            .collect();
        self.responses.insert(tool.to_string(), Ok(content));
        self
    }

    pub fn with_content(mut self, tool: &str, content: Vec<Content>) -> Self {
        self.responses.insert(tool.to_string(), Ok(content));
        self
    }

    pub fn with_error(mut self, tool: &str, error: LyricsError) -> Self {
        self.responses.insert(tool.to_string(), Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ToolTransport for MockTransport {
    async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> LyricsResult<Vec<Content>> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.to_string(), arguments));
        self.responses
            .get(tool)
            .cloned()
            .unwrap_or_else(|| Err(LyricsError::Transport(format!("no such tool: {}", tool))))
    }

    async fn close(&mut self) -> LyricsResult<()> {
        *self.closes.lock().unwrap() += 1;
        Ok(())
    }
}
