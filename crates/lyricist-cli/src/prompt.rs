use anyhow::Result;
use lyricist::resolver::Selector;

pub mod rustyline;

pub trait Prompt {
    /// Print a plain line of output
    fn render(&mut self, text: &str);
    /// Print model output, which is usually markdown
    fn render_markdown(&mut self, content: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    /// Stop the busy indicator, if one is showing
    fn hide_busy(&mut self);
    /// The same prompt, seen as the disambiguation side of the resolver
    fn selector(&mut self) -> &mut dyn Selector;
    fn ready(&mut self) {
        self.render("\nLyrics Meaning Client Started!");
        self.render("Type a Genius URL, song name, or 'song name by artist'. Type 'quit' to exit.");
    }
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Only set for messages
}

pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a song query
    Exit,     // User wants to exit the session
}

impl Input {
    pub fn message<S: Into<String>>(content: S) -> Self {
        Input {
            input_type: InputType::Message,
            content: Some(content.into()),
        }
    }

    pub fn exit() -> Self {
        Input {
            input_type: InputType::Exit,
            content: None,
        }
    }

    pub fn ask_again() -> Self {
        Input {
            input_type: InputType::AskAgain,
            content: None,
        }
    }

    /// Classify one line typed at the song prompt
    pub fn from_line(line: &str) -> Self {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            Input::exit()
        } else if line.is_empty() {
            Input::ask_again()
        } else {
            Input::message(line)
        }
    }
}
