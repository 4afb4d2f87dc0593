//! Conversational agent: runs the Claude tool loop against a finder session.
//!
//! This service handles the complete flow of:
//! 1. Converting the session transcript to Claude messages
//! 2. Calling the model with the finder tools
//! 3. Executing requested tools and feeding results back
//! 4. Recording the exchange once the model answers in text

use askama::Template;
use findmystore_core::{Category, ChatRole, CurrencyCode};
use tracing::{info, instrument, warn};

use crate::claude::{ChatModel, ClaudeError, ContentBlock, Message, ToolExecutor, finder_tools};
use crate::services::registry::StoreDirectory;
use crate::services::session::FinderSession;

/// Maximum number of model calls per user message.
pub const MAX_TOOL_ITERATIONS: usize = 10;

/// System prompt template for the shopping assistant.
#[derive(Template)]
#[template(path = "agent/system_prompt.txt")]
struct SystemPromptTemplate<'a> {
    default_city: &'a str,
    currency_code: &'a str,
    currency_symbol: &'a str,
    categories: Vec<&'static str>,
}

/// Errors that can occur while answering a chat message.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Claude API error.
    #[error("Claude API error: {0}")]
    Claude(#[from] ClaudeError),

    /// The model kept calling tools.
    #[error("too many tool iterations")]
    TooManyToolIterations,

    /// No model is configured.
    #[error("chat assistant is not configured (set CLAUDE_API_KEY)")]
    NotConfigured,
}

/// Shopping assistant bound to a model and a store directory.
pub struct AgentService<'a, M> {
    model: Option<&'a M>,
    directory: &'a StoreDirectory,
    default_city: &'a str,
    currency: CurrencyCode,
}

impl<'a, M: ChatModel> AgentService<'a, M> {
    #[must_use]
    pub const fn new(
        model: Option<&'a M>,
        directory: &'a StoreDirectory,
        default_city: &'a str,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            model,
            directory,
            default_city,
            currency,
        }
    }

    /// Answer a message, turning any failure into an `Agent error: ...` reply.
    pub async fn run(&self, session: &mut FinderSession, message: &str) -> String {
        match self.send_message(session, message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %session.id(), error = %e, "Agent request failed");
                format!("Agent error: {e}")
            }
        }
    }

    /// Answer a message using the tool loop.
    ///
    /// The transcript is only extended when the model produces a final answer.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is configured, the model call fails, or
    /// the loop exceeds [`MAX_TOOL_ITERATIONS`].
    #[instrument(skip(self, session, message), fields(session_id = %session.id()))]
    pub async fn send_message(
        &self,
        session: &mut FinderSession,
        message: &str,
    ) -> Result<String, AgentError> {
        let model = self.model.ok_or(AgentError::NotConfigured)?;

        let mut messages: Vec<Message> = session.transcript().iter().map(Message::from).collect();
        messages.push(Message::text(ChatRole::User, message));

        let tools = finder_tools();
        let system_prompt = self.render_system_prompt();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > MAX_TOOL_ITERATIONS {
                warn!("Too many tool iterations, stopping");
                return Err(AgentError::TooManyToolIterations);
            }

            let response = model
                .chat(
                    messages.clone(),
                    Some(system_prompt.clone()),
                    Some(tools.clone()),
                )
                .await?;

            info!(
                stop_reason = ?response.stop_reason,
                content_blocks = response.content.len(),
                "Claude response received"
            );

            if !response.wants_tools() {
                let reply = response.text();
                session.record_exchange(message, &reply);
                return Ok(reply);
            }

            let mut executor = ToolExecutor::new(session, self.directory, self.default_city);
            let mut tool_results = Vec::new();
            for block in &response.content {
                if let ContentBlock::ToolUse { id, name, input } = block {
                    let (content, is_error) = match executor.execute(name, input).await {
                        Ok(result) => (result, false),
                        Err(e) => (format!("Error: {e}"), true),
                    };
                    tool_results.push(ContentBlock::ToolResult {
                        tool_use_id: id.clone(),
                        content,
                        is_error: Some(is_error),
                    });
                }
            }

            messages.push(Message::blocks(ChatRole::Assistant, response.content));
            messages.push(Message::blocks(ChatRole::User, tool_results));
        }
    }

    fn render_system_prompt(&self) -> String {
        let template = SystemPromptTemplate {
            default_city: self.default_city,
            currency_code: self.currency.as_str(),
            currency_symbol: self.currency.symbol(),
            categories: Category::SEARCHABLE.iter().map(Category::as_str).collect(),
        };
        template
            .render()
            .unwrap_or_else(|_| String::from("You are a helpful shopping assistant."))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use findmystore_core::SessionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;
    use crate::claude::{ChatResponse, MessageContent, StopReason, Tool, Usage};

    /// Model that replays canned responses and records what it was sent.
    struct ScriptedModel {
        responses: Mutex<VecDeque<Result<ChatResponse, ClaudeError>>>,
        requests: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<ChatResponse, ClaudeError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Vec<Message>> {
            self.requests.lock().expect("lock").clone()
        }
    }

    impl ChatModel for ScriptedModel {
        async fn chat(
            &self,
            messages: Vec<Message>,
            system: Option<String>,
            tools: Option<Vec<Tool>>,
        ) -> Result<ChatResponse, ClaudeError> {
            assert!(system.is_some_and(|s| s.contains("Hyderabad")));
            assert_eq!(tools.as_ref().map(Vec::len), Some(6));
            self.requests.lock().expect("lock").push(messages);
            self.responses
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Ok(text_response("out of script")))
        }
    }

    fn response(stop_reason: StopReason, content: Vec<ContentBlock>) -> ChatResponse {
        ChatResponse {
            id: "msg_test".to_string(),
            model: "scripted".to_string(),
            stop_reason: Some(stop_reason),
            content,
            usage: Usage::default(),
        }
    }

    fn text_response(text: &str) -> ChatResponse {
        response(
            StopReason::EndTurn,
            vec![ContentBlock::Text {
                text: text.to_string(),
            }],
        )
    }

    fn tool_call(id: &str, name: &str, input: serde_json::Value) -> ChatResponse {
        response(
            StopReason::ToolUse,
            vec![ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input,
            }],
        )
    }

    fn session() -> FinderSession {
        FinderSession::new(SessionId::generate(), StdRng::seed_from_u64(3))
    }

    fn agent<'a>(
        model: Option<&'a ScriptedModel>,
        directory: &'a StoreDirectory,
    ) -> AgentService<'a, ScriptedModel> {
        AgentService::new(model, directory, "Hyderabad", CurrencyCode::INR)
    }

    #[tokio::test]
    async fn test_plain_answer_is_recorded() {
        let greeting = "Hello! What are you shopping for?";
        let model = ScriptedModel::new(vec![Ok(text_response(greeting))]);
        let directory = StoreDirectory::offline();
        let mut session = session();

        let reply = agent(Some(&model), &directory).run(&mut session, "hi").await;
        assert_eq!(reply, greeting);
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[0].text, "hi");
    }

    #[tokio::test]
    async fn test_tool_loop_executes_tools_and_feeds_results_back() {
        let model = ScriptedModel::new(vec![
            Ok(tool_call("toolu_1", "find_cheapest", json!({"product": "Rice 10kg"}))),
            Ok(text_response("SmartMart has it for ₹489.")),
        ]);
        let directory = StoreDirectory::offline();
        let mut session = session();

        let reply = agent(Some(&model), &directory)
            .run(&mut session, "Where is rice cheapest?")
            .await;
        assert_eq!(reply, "SmartMart has it for ₹489.");

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert_eq!(second.len(), 3);
        let MessageContent::Blocks(blocks) = &second[2].content else {
            panic!("expected tool result blocks");
        };
        let ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } = &blocks[0]
        else {
            panic!("expected tool result");
        };
        assert_eq!(tool_use_id, "toolu_1");
        assert_eq!(*is_error, Some(false));
        assert!(content.contains("\"product\": \"Rice 10kg\""));
        assert!(content.contains("\"store\""));
    }

    #[tokio::test]
    async fn test_tool_failure_is_reported_to_model() {
        let model = ScriptedModel::new(vec![
            Ok(tool_call("toolu_1", "check_inventory", json!({"product": "Ghee"}))),
            Ok(text_response("Which store?")),
        ]);
        let directory = StoreDirectory::offline();
        let mut session = session();

        let reply = agent(Some(&model), &directory).run(&mut session, "ghee?").await;
        assert_eq!(reply, "Which store?");

        let requests = model.requests();
        let MessageContent::Blocks(blocks) = &requests[1][2].content else {
            panic!("expected tool result blocks");
        };
        let ContentBlock::ToolResult { is_error, content, .. } = &blocks[0] else {
            panic!("expected a tool result");
        };
        assert_eq!(*is_error, Some(true));
        assert!(content.starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_transcript_is_sent_as_context() {
        let model = ScriptedModel::new(vec![Ok(text_response("one")), Ok(text_response("two"))]);
        let directory = StoreDirectory::offline();
        let mut session = session();
        let agent = agent(Some(&model), &directory);

        agent.run(&mut session, "first").await;
        agent.run(&mut session, "second").await;

        let requests = model.requests();
        assert_eq!(requests[1].len(), 3);
        assert_eq!(requests[1][0], Message::text(ChatRole::User, "first"));
        assert_eq!(requests[1][1], Message::text(ChatRole::Assistant, "one"));
    }

    #[tokio::test]
    async fn test_model_error_becomes_agent_error_text() {
        let model = ScriptedModel::new(vec![Err(ClaudeError::RateLimited(30))]);
        let directory = StoreDirectory::offline();
        let mut session = session();

        let reply = agent(Some(&model), &directory).run(&mut session, "hi").await;
        assert_eq!(
            reply,
            "Agent error: Claude API error: rate limited, retry after 30 seconds"
        );
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_runaway_tool_loop_is_stopped() {
        let calls = (0..=MAX_TOOL_ITERATIONS)
            .map(|i| {
                Ok(tool_call(
                    &format!("toolu_{i}"),
                    "check_inventory",
                    json!({"store_id": 1, "product": "Ghee"}),
                ))
            })
            .collect();
        let model = ScriptedModel::new(calls);
        let directory = StoreDirectory::offline();
        let mut session = session();

        let reply = agent(Some(&model), &directory).run(&mut session, "loop").await;
        assert_eq!(reply, "Agent error: too many tool iterations");
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_missing_model_reports_not_configured() {
        let directory = StoreDirectory::offline();
        let mut session = session();

        let reply = agent(None, &directory).run(&mut session, "hi").await;
        assert_eq!(
            reply,
            "Agent error: chat assistant is not configured (set CLAUDE_API_KEY)"
        );
    }

    #[test]
    fn test_system_prompt_mentions_conventions() {
        let directory = StoreDirectory::offline();
        let prompt = agent(None, &directory).render_system_prompt();
        assert!(prompt.contains("INR"));
        assert!(prompt.contains('₹'));
        assert!(prompt.contains("grocery, pharmacy, electronics, clothing, bakery, restaurant."));
    }
}
