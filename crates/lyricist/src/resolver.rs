use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map};
use tracing::debug;

use crate::errors::{LyricsError, LyricsResult};
use crate::models::song::{Reference, SearchHit, SearchResult};
use crate::transport::{ToolTransport, SEARCH_TOOL};

/// At most this many search results are offered to the user
pub const MAX_CANDIDATES: usize = 3;

lazy_static! {
    static ref DIRECT_REFERENCE: Regex =
        Regex::new(r"^https://genius\.com/").expect("direct reference pattern is valid");
}

/// What a raw query turned into before any user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The query already was a song page
    Direct(Reference),
    /// Search hits, earliest-ranked first, at most `MAX_CANDIDATES`
    Candidates(Vec<SearchResult>),
    NoResults,
}

/// One parsed attempt at picking a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the candidates
    Chosen(usize),
    Quit,
    Invalid,
}

/// The interactive side of disambiguation
pub trait Selector {
    /// Show the numbered candidates
    fn present(&mut self, candidates: &[SearchResult]);

    /// Read one selection attempt. `None` means input has ended.
    fn read_selection(&mut self) -> LyricsResult<Option<String>>;

    /// Tell the user the last attempt was not accepted
    fn reject(&mut self, input: &str);

    /// Tell the user the search came back empty
    fn no_results(&mut self);
}

pub fn is_direct_reference(query: &str) -> bool {
    DIRECT_REFERENCE.is_match(query.trim())
}

/// Classify the query and, if it is not a direct reference, run the search tool
pub async fn lookup(transport: &dyn ToolTransport, query: &str) -> LyricsResult<Resolution> {
    let query = query.trim();
    if is_direct_reference(query) {
        debug!(query, "query is a direct reference");
        return Ok(Resolution::Direct(Reference::new(query)));
    }

    let mut arguments = Map::new();
    arguments.insert("query".to_string(), json!(query));
    let blocks = transport.invoke(SEARCH_TOOL, arguments).await?;

    let mut results = blocks
        .iter()
        .map(|block| {
            let text = block.as_text().ok_or_else(|| {
                LyricsError::malformed(SEARCH_TOOL, format!("expected text, got {}", block.kind()))
            })?;
            serde_json::from_str::<SearchHit>(text)
                .map(SearchResult::from)
                .map_err(|e| LyricsError::malformed(SEARCH_TOOL, e))
        })
        .collect::<LyricsResult<Vec<_>>>()?;

    debug!(query, hits = results.len(), "search finished");
    if results.is_empty() {
        return Ok(Resolution::NoResults);
    }
    results.truncate(MAX_CANDIDATES);
    Ok(Resolution::Candidates(results))
}

/// Parse a selection attempt against a list of `available` candidates
pub fn parse_selection(input: &str, available: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Selection::Quit;
    }

    // Only the literal digits are accepted, so "01" or "+2" are invalid
    let index = match input {
        "1" => 0,
        "2" => 1,
        "3" => 2,
        _ => return Selection::Invalid,
    };
    if index < available.min(MAX_CANDIDATES) {
        Selection::Chosen(index)
    } else {
        Selection::Invalid
    }
}

/// Ask until the user picks a candidate or quits
pub fn choose(
    candidates: &[SearchResult],
    selector: &mut dyn Selector,
) -> LyricsResult<Option<Reference>> {
    selector.present(candidates);
    loop {
        let Some(input) = selector.read_selection()? else {
            return Ok(None);
        };
        match parse_selection(&input, candidates.len()) {
            Selection::Chosen(index) => return Ok(Some(candidates[index].reference.clone())),
            Selection::Quit => return Ok(None),
            Selection::Invalid => selector.reject(&input),
        }
    }
}

/// Turn a raw query into a reference, or `None` if the cycle was abandoned
pub async fn resolve(
    transport: &dyn ToolTransport,
    query: &str,
    selector: &mut dyn Selector,
) -> LyricsResult<Option<Reference>> {
    match lookup(transport, query).await? {
        Resolution::Direct(reference) => Ok(Some(reference)),
        Resolution::NoResults => {
            selector.no_results();
            Ok(None)
        }
        Resolution::Candidates(candidates) => choose(&candidates, selector),
    }
}
