// Public modules
pub mod assistant;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use assistant::{Assistant, AssistantUnavailable, FALLBACK_REPLY};
pub use client::FlowFix;
pub use client_logger::{ClientLogger, StderrLogger};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
