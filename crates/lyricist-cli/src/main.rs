use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use lyricist::providers::configs::{
    OpenAiProviderConfig, ProviderConfig, OPENAI_DEFAULT_HOST, OPENAI_DEFAULT_MODEL,
};
use lyricist::providers::openai::OpenAiProvider;
use lyricist::transport::{McpTransport, ServerCommand};

mod prompt;
mod session;

use prompt::rustyline::RustylinePrompt;
use prompt::Prompt;
use session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the lyrics MCP server (.py and .js scripts run through python and node)
    server: String,

    /// Model to use
    #[arg(short, long, default_value = OPENAI_DEFAULT_MODEL)]
    model: String,

    /// OpenAI API Key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// OpenAI compatible host (can also be set via OPENAI_API_HOST environment variable)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let provider = OpenAiProvider::new(create_provider_config(&cli)?)?;
    tracing::info!(model = provider.model(), "using completion model");

    let mut prompt = RustylinePrompt::new()?;
    let transport = McpTransport::connect(&ServerCommand::from_path(&cli.server))
        .await
        .with_context(|| format!("Failed to connect to lyrics server {}", cli.server))?;
    prompt.render("Connected to lyrics MCP server.");

    Session::new(Box::new(transport), Box::new(provider), Box::new(prompt))
        .start()
        .await
}

/// Logs go to stderr so stdout only carries the conversation
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create_provider_config(cli: &Cli) -> Result<OpenAiProviderConfig> {
    let mut config = match &cli.api_key {
        Some(api_key) => {
            let host = OpenAiProviderConfig::get_env("OPENAI_API_HOST", false, None)?
                .unwrap_or_else(|| OPENAI_DEFAULT_HOST.to_string());
            OpenAiProviderConfig::new(host, api_key.clone(), cli.model.clone())
        }
        None => OpenAiProviderConfig::from_env()
            .context("API key must be provided via --api-key or OPENAI_API_KEY environment variable")?
            .with_model(&cli.model),
    };

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    Ok(config)
}
