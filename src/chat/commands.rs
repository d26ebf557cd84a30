//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the widget without sending messages to the
//! assistant.

/// A parsed chat command.
///
/// These commands control the chat widget and are not sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Show the widget.
    Open,

    /// Hide the widget; the conversation is kept.
    Close,

    /// Discard the conversation and start a fresh one.
    New,

    /// Print the whole transcript again.
    History,

    /// Save the transcript to a file.
    SaveTranscript(String),

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use flowfix::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/save chat.json").is_some());
/// assert!(parse_command("My sink is blocked").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "open" | "show" => ChatCommand::Open,
        "close" | "hide" => ChatCommand::Close,
        "new" | "reset" => ChatCommand::New,
        "history" => ChatCommand::History,
        "save" => match argument {
            Some(arg) => ChatCommand::SaveTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /open                  Show the chat (starts a conversation the first time)
  /close                 Hide the chat; the conversation is kept
  /new                   Discard the conversation and start over
  /history               Print the conversation so far
  /save <file>           Save the conversation as JSON
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
