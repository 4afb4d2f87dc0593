//! Claude API integration for the conversational shopping assistant.
//!
//! # Features
//!
//! - Non-streaming Messages API client with tool use
//! - Structured tool schemas for every finder operation
//! - [`ChatModel`] seam so the agent loop can run against a scripted model
//!
//! The tool loop itself lives in [`crate::services::agent`].

mod client;
mod error;
mod tools;
mod types;

use std::future::Future;

pub use client::ClaudeClient;
pub use error::{ApiError, ApiErrorResponse, ClaudeError};
pub use tools::{ToolExecutor, finder_tools};
pub use types::{
    ChatRequest, ChatResponse, ContentBlock, Message, MessageContent, StopReason, Tool, Usage,
};

/// A language model that can answer with text or tool calls.
pub trait ChatModel: Send + Sync {
    /// Send the conversation and get the model's next response.
    fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Option<Vec<Tool>>,
    ) -> impl Future<Output = Result<ChatResponse, ClaudeError>> + Send;
}
