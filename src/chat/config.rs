//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::env;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::{BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Command-line arguments for the flowfix-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the assistant.
    #[arrrg(optional, "Assistant base URL (default: $FLOWFIX_CHAT_URL or http://127.0.0.1:5000/)", "URL")]
    pub url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Session identifier sent with every request.
    #[arrrg(optional, "Session id to send with each message", "ID")]
    pub session_id: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log every exchange to stderr.
    #[arrrg(flag, "Log requests and responses to stderr")]
    pub verbose: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Base URL of the assistant; `/chat` is appended by the client.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Optional session identifier attached to every request.
    pub session_id: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log every exchange to stderr.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: http://127.0.0.1:5000/
    /// - Timeout: 60 seconds
    /// - Session id: none
    /// - Color: enabled
    /// - Verbose: disabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            session_id: None,
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the session identifier.
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Enables logging of every exchange.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    fn resolve(args: ChatArgs, env_url: Option<String>) -> Self {
        let base_url = args
            .url
            .or(env_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        ChatConfig {
            base_url,
            timeout: args
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            session_id: args.session_id,
            use_color: !args.no_color,
            verbose: args.verbose,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        Self::resolve(args, env::var(BASE_URL_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.base_url, "http://127.0.0.1:5000/");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.session_id.is_none());
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::resolve(ChatArgs::default(), None);
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn env_url_used_when_flag_absent() {
        let config = ChatConfig::resolve(
            ChatArgs::default(),
            Some("https://assist.flowfix.example/".to_string()),
        );
        assert_eq!(config.base_url, "https://assist.flowfix.example/");

        let args = ChatArgs {
            url: Some("http://localhost:9000/".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::resolve(args, Some("https://ignored.example/".to_string()));
        assert_eq!(config.base_url, "http://localhost:9000/");
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            url: Some("http://localhost:9000/".to_string()),
            timeout: Some(5),
            session_id: Some("visitor-1".to_string()),
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::resolve(args, None);
        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.session_id.as_deref(), Some("visitor-1"));
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("http://localhost:9000/")
            .with_timeout(Duration::from_secs(10))
            .with_session_id(Some("s".to_string()))
            .without_color()
            .verbose();
        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.session_id.as_deref(), Some("s"));
        assert!(!config.use_color);
        assert!(config.verbose);
    }
}
