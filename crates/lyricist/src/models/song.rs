use serde::Deserialize;
use std::fmt;

/// Opaque identifier for a song page, as understood by the parse tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference(String);

impl Reference {
    pub fn new<S: Into<String>>(reference: S) -> Self {
        Reference(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One candidate returned by the search tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub artist: String,
    pub reference: Reference,
}

/// Wire shape of a single `search_genius` block
#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    title: String,
    artist_names: String,
    url: String,
}

impl From<SearchHit> for SearchResult {
    fn from(hit: SearchHit) -> Self {
        SearchResult {
            title: hit.title,
            artist: hit.artist_names,
            reference: Reference(hit.url),
        }
    }
}

/// A community note attached to an excerpt of the lyrics
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Annotation {
    #[serde(rename = "lyric")]
    pub excerpt: String,
    /// Absent, `null` and empty notes all decode; only the composer decides
    /// whether a note is worth including.
    #[serde(rename = "annotation_text", default)]
    pub note: Option<String>,
}

impl Annotation {
    pub fn new<S: Into<String>>(excerpt: S, note: Option<&str>) -> Self {
        Annotation {
            excerpt: excerpt.into(),
            note: note.map(String::from),
        }
    }

    /// The note, if it carries any text
    pub fn qualifying_note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }
}

/// Lyrics and annotations for one song, consumed once by the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongContent {
    pub lyrics: String,
    pub annotations: Vec<Annotation>,
}

/// Wire shape of the first `parse_lyrics` block
///
/// Variant order matters: a payload carrying `error` is a failure even when
/// other keys are present.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ParsePayload {
    Failure {
        error: String,
    },
    Success {
        lyrics: String,
        annotations: Vec<Annotation>,
    },
}
