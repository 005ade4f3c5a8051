use serde_json::{json, Map};
use tracing::debug;

use crate::errors::{LyricsError, LyricsResult};
use crate::models::song::{ParsePayload, Reference, SongContent};
use crate::transport::{ToolTransport, PARSE_TOOL};

/// Result of asking the parse tool for a song page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Song(SongContent),
    /// The tool understood the request but could not produce content
    Unavailable(String),
}

/// Fetch lyrics and annotations for a resolved reference
pub async fn fetch(transport: &dyn ToolTransport, reference: &Reference) -> LyricsResult<FetchOutcome> {
    let mut arguments = Map::new();
    arguments.insert("url".to_string(), json!(reference.as_str()));
    let blocks = transport.invoke(PARSE_TOOL, arguments).await?;

    let block = blocks
        .first()
        .ok_or_else(|| LyricsError::malformed(PARSE_TOOL, "no content blocks"))?;
    let text = block.as_text().ok_or_else(|| {
        LyricsError::malformed(PARSE_TOOL, format!("expected text, got {}", block.kind()))
    })?;

    let payload: ParsePayload =
        serde_json::from_str(text).map_err(|e| LyricsError::malformed(PARSE_TOOL, e))?;

    Ok(match payload {
        ParsePayload::Failure { error } => {
            debug!(%reference, %error, "parse tool reported an error");
            FetchOutcome::Unavailable(error)
        }
        ParsePayload::Success {
            lyrics,
            annotations,
        } => {
            debug!(%reference, annotations = annotations.len(), "fetched song");
            FetchOutcome::Song(SongContent {
                lyrics,
                annotations,
            })
        }
    })
}
