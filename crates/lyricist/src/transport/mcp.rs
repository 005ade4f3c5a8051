use async_trait::async_trait;
use rmcp::model::CallToolRequestParams;
use rmcp::service::RunningService;
use rmcp::transport::child_process::TokioChildProcess;
use rmcp::transport::IntoTransport;
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Map, Value};
use std::path::Path;
use std::process::Stdio;
use tracing::{debug, info, warn};
use which::which;

use super::{ToolTransport, PARSE_TOOL, SEARCH_TOOL};
use crate::errors::{LyricsError, LyricsResult};
use crate::models::content::Content;

/// How to launch an MCP server given the path the user passed on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ServerCommand {
    /// Scripts are run through their interpreter, anything else is executed directly
    pub fn from_path(path: &str) -> Self {
        let interpreter = match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("py") => Some("python"),
            Some("js") => Some("node"),
            _ => None,
        };

        match interpreter {
            Some(program) => ServerCommand {
                program: program.to_string(),
                args: vec![path.to_string()],
            },
            None => ServerCommand {
                program: path.to_string(),
                args: Vec::new(),
            },
        }
    }

    fn resolve(&self) -> LyricsResult<tokio::process::Command> {
        if which(&self.program).is_err() && !Path::new(&self.program).exists() {
            return Err(LyricsError::Transport(format!(
                "Command not found: {}",
                self.program
            )));
        }

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stderr(Stdio::inherit())
            .stdout(Stdio::piped())
            .stdin(Stdio::piped());
        Ok(cmd)
    }
}

/// An MCP client session with a child-process server over stdio
pub struct McpTransport {
    service: Option<RunningService<RoleClient, ()>>,
    missing_tools: Vec<&'static str>,
}

impl McpTransport {
    /// Spawn the server and complete the initialize handshake
    pub async fn connect(server: &ServerCommand) -> LyricsResult<Self> {
        let cmd = server.resolve()?;
        let transport = TokioChildProcess::new(cmd).map_err(|e| {
            LyricsError::Transport(format!("failed to spawn {}: {}", server.program, e))
        })?;
        let connected = Self::handshake(transport).await?;
        info!(program = %server.program, "connected to MCP server");
        Ok(connected)
    }

    /// Complete the initialize handshake over an already established transport
    pub async fn handshake<T, E, A>(transport: T) -> LyricsResult<Self>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let service = ()
            .serve(transport)
            .await
            .map_err(|e| LyricsError::Transport(format!("initialize failed: {}", e)))?;

        let mut connected = Self {
            service: Some(service),
            missing_tools: Vec::new(),
        };
        connected.missing_tools = connected.check_tools().await?;
        Ok(connected)
    }

    /// Required tools the server did not advertise at connect time
    pub fn missing_tools(&self) -> &[&'static str] {
        &self.missing_tools
    }

    async fn check_tools(&self) -> LyricsResult<Vec<&'static str>> {
        let tools = self
            .service()?
            .list_all_tools()
            .await
            .map_err(|e| LyricsError::Transport(format!("failed to list tools: {}", e)))?;

        let missing: Vec<_> = [SEARCH_TOOL, PARSE_TOOL]
            .into_iter()
            .filter(|expected| !tools.iter().any(|tool| tool.name == *expected))
            .collect();
        for tool in &missing {
            warn!(tool = *tool, "server does not advertise a required tool");
        }
        Ok(missing)
    }

    fn service(&self) -> LyricsResult<&RunningService<RoleClient, ()>> {
        self.service
            .as_ref()
            .ok_or_else(|| LyricsError::Transport("session is closed".to_string()))
    }
}

#[async_trait]
impl ToolTransport for McpTransport {
    async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> LyricsResult<Vec<Content>> {
        debug!(tool, "invoking remote tool");
        let result = self
            .service()?
            .call_tool(CallToolRequestParams::new(tool.to_string()).with_arguments(arguments))
            .await
            .map_err(|e| LyricsError::Transport(format!("call to `{}` failed: {}", tool, e)))?;

        let content: Vec<Content> = result.content.iter().map(convert_content).collect();

        if result.is_error == Some(true) {
            let message = content
                .iter()
                .filter_map(|c| c.as_text())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(LyricsError::Transport(format!(
                "`{}` reported an error: {}",
                tool, message
            )));
        }

        debug!(tool, blocks = content.len(), "remote tool returned");
        Ok(content)
    }

    async fn close(&mut self) -> LyricsResult<()> {
        if let Some(service) = self.service.take() {
            service
                .cancel()
                .await
                .map_err(|e| LyricsError::Transport(format!("shutdown failed: {}", e)))?;
            info!("disconnected from MCP server");
        }
        Ok(())
    }
}

fn convert_content(block: &rmcp::model::Content) -> Content {
    if let Some(text) = block.as_text() {
        Content::text(text.text.clone())
    } else if let Some(image) = block.as_image() {
        Content::image(image.data.clone(), image.mime_type.clone())
    } else {
        Content::Unsupported
    }
}
