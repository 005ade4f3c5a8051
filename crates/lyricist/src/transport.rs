use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::LyricsResult;
use crate::models::content::Content;

pub mod mcp;
#[cfg(test)]
pub mod mock;

pub use mcp::{McpTransport, ServerCommand};

/// Name of the remote tool that searches for songs
pub const SEARCH_TOOL: &str = "search_genius";
/// Name of the remote tool that fetches lyrics and annotations for a page
pub const PARSE_TOOL: &str = "parse_lyrics";

/// A live channel to a remote tool provider
///
/// Implementations must be connected before they are handed out, and must
/// release their underlying resources the first time `close` is called.
/// Further calls to `close` are no-ops.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Invoke a tool by name and return the content blocks it produced
    async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> LyricsResult<Vec<Content>>;

    /// Tear down the channel
    async fn close(&mut self) -> LyricsResult<()>;
}
