// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod message;
pub mod sender;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::{AssistantReply, ChatResponse};
pub use message::Message;
pub use sender::Sender;
