use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use lyricist::errors::{LyricsError, LyricsResult};
use lyricist::models::song::SearchResult;
use lyricist::resolver::{Selector, MAX_CANDIDATES};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::{Input, Prompt};

const SONG_PROMPT: &str = "Song or URL: ";
const THEME: &str = "zenburn";

pub struct RustylinePrompt {
    editor: DefaultEditor,
    spinner: Option<cliclack::ProgressBar>,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(RustylinePrompt {
            editor: DefaultEditor::new()?,
            spinner: None,
        })
    }

    /// Read one line; `None` on Ctrl-C or Ctrl-D
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ReadlineError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn selection_prompt() -> String {
    format!("Select a song (1-{}) or 'q' to quit: ", MAX_CANDIDATES)
}

fn print_markdown(content: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();

    if printed.is_err() {
        println!("{}", content);
    }
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, text: &str) {
        println!("{}", text);
    }

    fn render_markdown(&mut self, content: &str) {
        print_markdown(content);
        println!();
        io::stdout().flush().ok();
    }

    fn get_input(&mut self) -> Result<Input> {
        println!();
        match self.read_line(SONG_PROMPT)? {
            Some(line) => {
                let input = Input::from_line(&line);
                if input.content.is_some() {
                    self.editor.add_history_entry(line.trim())?;
                }
                Ok(input)
            }
            None => Ok(Input::exit()),
        }
    }

    fn show_busy(&mut self) {
        let busy = spinner();
        busy.start("awaiting reply...");
        self.spinner = Some(busy);
    }

    fn hide_busy(&mut self) {
        if let Some(busy) = self.spinner.take() {
            busy.stop("");
        }
    }

    fn selector(&mut self) -> &mut dyn Selector {
        self
    }
}

impl Selector for RustylinePrompt {
    fn present(&mut self, candidates: &[SearchResult]) {
        println!("\n{}", style(format!("Top {} Genius results:", MAX_CANDIDATES)).bold());
        for (idx, candidate) in candidates.iter().enumerate() {
            println!(
                "{}. {} by {} - {}",
                idx + 1,
                candidate.title,
                candidate.artist,
                style(&candidate.reference).dim()
            );
        }
    }

    fn read_selection(&mut self) -> LyricsResult<Option<String>> {
        self.read_line(&selection_prompt())
            .map_err(|e| LyricsError::Input(e.to_string()))
    }

    fn reject(&mut self, _input: &str) {
        println!("Invalid choice.");
    }

    fn no_results(&mut self) {
        println!("No results found.");
    }
}
