//! These models represent the objects passed around a lyrics session
//!
//! There are a few different related formats we need to interact with:
//! - content blocks returned by the remote tools (search and parse)
//! - the JSON payloads carried inside those blocks
//! - openai messages, sent from the composer to the LLM
//!
//! We always immediately convert those wire formats into the internal structs,
//! so the resolver, fetcher and composer never see raw JSON.
pub mod content;
pub mod message;
pub mod role;
pub mod song;
