use indoc::formatdoc;
use tracing::debug;

use crate::errors::{LyricsError, LyricsResult};
use crate::models::message::Message;
use crate::models::song::{Annotation, SongContent};
use crate::providers::base::Provider;

const INSTRUCTION: &str =
    "Given the following song lyrics and their annotations, explain the meaning of the song in detail.";

/// Placeholder used when no annotation carries a note
pub const EMPTY_DIGEST: &str = "None";

/// One `- excerpt: note` line per annotation with a note, in fetched order
pub fn annotation_digest(annotations: &[Annotation]) -> String {
    let lines: Vec<String> = annotations
        .iter()
        .filter_map(|annotation| {
            annotation
                .qualifying_note()
                .map(|note| format!("- {}: {}", annotation.excerpt, note))
        })
        .collect();

    if lines.is_empty() {
        EMPTY_DIGEST.to_string()
    } else {
        lines.join("\n")
    }
}

/// The full synthesis request. Lyrics and digest are embedded verbatim.
pub fn synthesis_prompt(lyrics: &str, annotations: &[Annotation]) -> String {
    formatdoc! {"
        {instruction}

        Lyrics:
        {lyrics}

        Annotations:
        {digest}",
        instruction = INSTRUCTION,
        lyrics = lyrics,
        digest = annotation_digest(annotations),
    }
}

/// Ask the provider to explain the song and return its text unmodified
pub async fn explain(provider: &dyn Provider, song: &SongContent) -> LyricsResult<String> {
    let prompt = synthesis_prompt(&song.lyrics, &song.annotations);
    debug!(prompt_chars = prompt.len(), "requesting explanation");

    let (response, usage) = provider
        .complete(&[Message::user().with_text(prompt)])
        .await
        .map_err(|e| LyricsError::Provider(format!("{:#}", e)))?;

    debug!(total_tokens = ?usage.total_tokens, "explanation received");
    Ok(response.as_concat_text())
}
