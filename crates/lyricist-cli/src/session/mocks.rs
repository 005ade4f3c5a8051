//! Test doubles for driving a `Session` without a server, a model or a terminal.
//!
//! The library keeps equivalent mocks behind its own `cfg(test)`, which other
//! crates cannot see, so the session tests carry their own.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::prompt::{Input, Prompt};
use lyricist::errors::{LyricsError, LyricsResult};
use lyricist::models::content::Content;
use lyricist::models::message::Message;
use lyricist::models::song::SearchResult;
use lyricist::providers::base::{Provider, Usage};
use lyricist::resolver::Selector;
use lyricist::transport::ToolTransport;

#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, LyricsResult<Vec<Content>>>,
    hanging: HashSet<String>,
    close_error: Option<LyricsError>,
    pub calls: Arc<Mutex<Vec<(String, Map<String, Value>)>>>,
    pub closes: Arc<Mutex<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `tool` with a single JSON block
    pub fn with_json(self, tool: &str, value: Value) -> Self {
        self.with_blocks(tool, vec![value])
    }

    /// Respond to `tool` with one JSON block per value
    pub fn with_blocks(mut self, tool: &str, values: Vec<Value>) -> Self {
        let content = values
            .into_iter()
            .map(|value| Content::text(value.to_string()))
            .collect();
        self.responses.insert(tool.to_string(), Ok(content));
        self
    }

    pub fn with_error(mut self, tool: &str, error: LyricsError) -> Self {
        self.responses.insert(tool.to_string(), Err(error));
        self
    }

    /// Calls to `tool` never complete
    pub fn with_hanging(mut self, tool: &str) -> Self {
        self.hanging.insert(tool.to_string());
        self
    }

    pub fn with_close_error(mut self, error: LyricsError) -> Self {
        self.close_error = Some(error);
        self
    }
}

#[async_trait]
impl ToolTransport for MockTransport {
    async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> LyricsResult<Vec<Content>> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.to_string(), arguments));
        if self.hanging.contains(tool) {
            std::future::pending::<()>().await;
        }
        self.responses
            .get(tool)
            .cloned()
            .unwrap_or_else(|| Err(LyricsError::Transport(format!("no such tool: {}", tool))))
    }

    async fn close(&mut self) -> LyricsResult<()> {
        *self.closes.lock().unwrap() += 1;
        match &self.close_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Answers every request with the same text and records the prompts it was sent
pub struct MockProvider {
    reply: Result<String, String>,
    hanging: bool,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            hanging: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Records the request, then never answers
    pub fn hanging() -> Self {
        Self {
            hanging: true,
            ..Self::new("")
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            hanging: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, messages: &[Message]) -> Result<(Message, Usage)> {
        let prompt = messages
            .iter()
            .map(|m| m.as_concat_text())
            .collect::<Vec<_>>()
            .join("\n");
        self.requests.lock().unwrap().push(prompt);
        if self.hanging {
            std::future::pending::<()>().await;
        }

        match &self.reply {
            Ok(text) => Ok((Message::assistant().with_text(text.as_str()), Usage::default())),
            Err(message) => Err(anyhow!(message.clone())),
        }
    }
}

/// Feeds queued lines to both the song prompt and the selection prompt
#[derive(Default)]
pub struct ScriptedPrompt {
    pub inputs: Arc<Mutex<VecDeque<String>>>,
    pub output: Arc<Mutex<Vec<String>>>,
    pub presented: Arc<Mutex<usize>>,
    pub busy: Arc<Mutex<bool>>,
}

impl ScriptedPrompt {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            inputs: Arc::new(Mutex::new(lines.iter().map(|s| s.to_string()).collect())),
            ..Default::default()
        }
    }

    fn next_line(&self) -> Option<String> {
        self.inputs.lock().unwrap().pop_front()
    }

    fn push(&self, text: &str) {
        self.output.lock().unwrap().push(text.to_string());
    }
}

impl Prompt for ScriptedPrompt {
    fn render(&mut self, text: &str) {
        self.push(text);
    }

    fn render_markdown(&mut self, content: &str) {
        self.push(content);
    }

    fn get_input(&mut self) -> Result<Input> {
        Ok(match self.next_line() {
            Some(line) => Input::from_line(&line),
            None => Input::exit(),
        })
    }

    fn show_busy(&mut self) {
        *self.busy.lock().unwrap() = true;
    }

    fn hide_busy(&mut self) {
        *self.busy.lock().unwrap() = false;
    }

    fn selector(&mut self) -> &mut dyn Selector {
        self
    }
}

impl Selector for ScriptedPrompt {
    fn present(&mut self, candidates: &[SearchResult]) {
        *self.presented.lock().unwrap() = candidates.len();
    }

    fn read_selection(&mut self) -> LyricsResult<Option<String>> {
        Ok(self.next_line())
    }

    fn reject(&mut self, _input: &str) {
        self.push("Invalid choice.");
    }

    fn no_results(&mut self) {
        self.push("No results found.");
    }
}
