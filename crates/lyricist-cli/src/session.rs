use anyhow::Result;
use std::future::Future;
use tracing::warn;

use crate::prompt::{InputType, Prompt};
use lyricist::composer::explain;
use lyricist::fetcher::{fetch, FetchOutcome};
use lyricist::providers::base::Provider;
use lyricist::resolver::resolve;
use lyricist::transport::ToolTransport;

#[cfg(test)]
mod mocks;

enum State {
    /// Waiting for the next song query
    Idle,
    /// Running one resolve, fetch, explain cycle for this query
    Active(String),
}

#[derive(Debug, PartialEq)]
enum CycleOutcome {
    Explained,
    Abandoned,
}

pub struct Session<'a> {
    transport: Box<dyn ToolTransport + 'a>,
    provider: Box<dyn Provider + 'a>,
    prompt: Box<dyn Prompt + 'a>,
}

impl<'a> Session<'a> {
    pub fn new(
        transport: Box<dyn ToolTransport + 'a>,
        provider: Box<dyn Provider + 'a>,
        prompt: Box<dyn Prompt + 'a>,
    ) -> Self {
        Session {
            transport,
            provider,
            prompt,
        }
    }

    /// Run cycles until the user quits, presses Ctrl-C, or a fatal error occurs.
    pub async fn start(self) -> Result<()> {
        self.start_until(ctrl_c()).await
    }

    /// Like `start`, but `interrupt` stands in for Ctrl-C.
    ///
    /// The transport is closed exactly once on every path out of here.
    async fn start_until(mut self, interrupt: impl Future<Output = ()>) -> Result<()> {
        self.prompt.ready();

        let finished = tokio::select! {
            result = self.run() => Some(result),
            _ = interrupt => None,
        };
        let result = finished.unwrap_or_else(|| {
            tracing::info!("session interrupted");
            self.prompt.hide_busy();
            self.prompt.render("\nInterrupted.");
            Ok(())
        });
        let closed = self.transport.close().await;

        match (result, closed) {
            (Err(e), Err(close_error)) => {
                warn!(error = %close_error, "failed to close transport");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), closed) => Ok(closed?),
        }
    }

    async fn run(&mut self) -> Result<()> {
        let mut state = State::Idle;
        loop {
            state = match state {
                State::Idle => {
                    let input = self.prompt.get_input()?;
                    match input.input_type {
                        InputType::Exit => break,
                        InputType::AskAgain => State::Idle,
                        InputType::Message => match input.content {
                            Some(query) => State::Active(query),
                            None => State::Idle,
                        },
                    }
                }
                State::Active(query) => {
                    let outcome = self.run_cycle(&query).await?;
                    tracing::debug!(?outcome, "cycle finished");
                    State::Idle
                }
            };
        }
        Ok(())
    }

    async fn run_cycle(&mut self, query: &str) -> Result<CycleOutcome> {
        let Some(reference) =
            resolve(self.transport.as_ref(), query, self.prompt.selector()).await?
        else {
            return Ok(CycleOutcome::Abandoned);
        };

        let song = match fetch(self.transport.as_ref(), &reference).await? {
            FetchOutcome::Song(song) if !song.lyrics.is_empty() => song,
            FetchOutcome::Song(_) => {
                self.prompt.render("Could not retrieve lyrics.");
                return Ok(CycleOutcome::Abandoned);
            }
            FetchOutcome::Unavailable(message) => {
                self.prompt.render(&message);
                self.prompt.render("Could not retrieve lyrics.");
                return Ok(CycleOutcome::Abandoned);
            }
        };

        self.prompt.render("\nCalling the model for song meaning...");
        self.prompt.show_busy();
        let explanation = explain(self.provider.as_ref(), &song).await;
        self.prompt.hide_busy();
        let explanation = explanation?;

        self.prompt.render("\nSong Meaning:");
        self.prompt.render_markdown(&explanation);
        Ok(CycleOutcome::Explained)
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
