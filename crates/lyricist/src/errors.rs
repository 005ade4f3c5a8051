use thiserror::Error;

/// Failures that end the current session.
///
/// Abandoning a cycle (no search hits, the user quitting a selection, the
/// parse tool reporting an error) is not represented here; those outcomes are
/// ordinary return values.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LyricsError {
    #[error("Malformed response from `{tool}`: {reason}")]
    MalformedResponse { tool: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Completion provider failed: {0}")]
    Provider(String),

    #[error("Failed to read input: {0}")]
    Input(String),
}

impl LyricsError {
    pub fn malformed<T: Into<String>, R: ToString>(tool: T, reason: R) -> Self {
        LyricsError::MalformedResponse {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }
}

pub type LyricsResult<T> = Result<T, LyricsError>;
