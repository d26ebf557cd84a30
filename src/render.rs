//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction that allows
//! for different output styles. The default implementation uses ANSI
//! escape codes to tell the two sides of the conversation apart.

use std::io::{self, Stdout, Write};

use crate::types::{Message, Sender};

/// ANSI escape code for dim text (used for the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the user label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the assistant label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI sequence that returns to column 0 and erases the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Name the assistant signs its messages with.
pub const ASSISTANT_NAME: &str = "Vern";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print one transcript message.
    fn print_message(&mut self, message: &Message);

    /// Show that the assistant is composing a reply.
    fn start_typing(&mut self);

    /// Remove the typing indicator.
    fn finish_typing(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    typing: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            typing: false,
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn label(sender: Sender) -> &'static str {
        match sender {
            Sender::User => "You",
            Sender::Assistant => ASSISTANT_NAME,
        }
    }

    /// Formats a message the way [`Renderer::print_message`] prints it.
    pub fn format_message(&self, message: &Message) -> String {
        let label = Self::label(message.sender);
        if self.use_color {
            let color = match message.sender {
                Sender::User => ANSI_CYAN,
                Sender::Assistant => ANSI_GREEN,
            };
            format!("{ANSI_BOLD}{color}{label}:{ANSI_RESET} {}", message.text)
        } else {
            format!("{label}: {}", message.text)
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        self.finish_typing();
        println!("{}", self.format_message(message));
        self.flush();
    }

    fn start_typing(&mut self) {
        if self.typing {
            return;
        }
        self.typing = true;
        if self.use_color {
            print!("{ANSI_DIM}{ASSISTANT_NAME} is typing...{ANSI_RESET}");
        } else {
            print!("{ASSISTANT_NAME} is typing...");
        }
        self.flush();
    }

    fn finish_typing(&mut self) {
        if !self.typing {
            return;
        }
        self.typing = false;
        if self.use_color {
            print!("{ANSI_CLEAR_LINE}");
        } else {
            println!();
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.finish_typing();
        if self.use_color {
            eprintln!("{ANSI_RED}Error:{ANSI_RESET} {error}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.finish_typing();
        println!("{info}");
    }
}
