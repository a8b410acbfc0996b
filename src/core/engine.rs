//! The inbound contract: one query in, one reply out.

use crate::core::answerer::{default_system_prompt, Answer, GeneralistAnswerer};
use crate::core::formatter;
use crate::core::knowledge::KnowledgeStore;
use crate::core::orchestrator::Orchestrator;
use crate::domain::model::{ChatReply, FormattedResponse, ReplySource};
use crate::domain::ports::{ConfigProvider, LanguageModel};
use crate::utils::error::{AssistantError, ErrorCategory, Result};
use serde_json::Value;

pub const GREETING_TOKENS: &[&str] = &["hi", "hello", "hey", "namaste", "namaskar"];
pub const DEFAULT_GREETING: &str =
    "Hello! I am your college campus assistant. How can I help you today?";
pub const EMPTY_QUERY_MESSAGE: &str = "No query provided.";

pub fn is_greeting(query: &str) -> bool {
    query
        .split_whitespace()
        .any(|token| GREETING_TOKENS.contains(&token.to_lowercase().as_str()))
}

/// Immutable after construction; share it behind an `Arc`.
pub struct AssistantEngine<M> {
    store: KnowledgeStore,
    orchestrator: Orchestrator,
    answerer: GeneralistAnswerer<M>,
    greeting: String,
}

impl<M: LanguageModel> AssistantEngine<M> {
    pub fn new(
        store: KnowledgeStore,
        orchestrator: Orchestrator,
        answerer: GeneralistAnswerer<M>,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            store,
            orchestrator,
            answerer,
            greeting: greeting.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, store: KnowledgeStore, model: M) -> Self {
        let matching = config.matching();
        let orchestrator = Orchestrator::new(
            matching.algorithm.build(),
            matching.staff_threshold,
            matching.general_threshold,
        );

        let generalist = config.generalist();
        let prompt = generalist
            .system_prompt
            .clone()
            .unwrap_or_else(|| default_system_prompt(config.college_name()));
        let answerer = GeneralistAnswerer::new(model, prompt)
            .with_timeout(generalist.timeout());

        Self::new(store, orchestrator, answerer, config.greeting())
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// JSON in, JSON out: `{"query": "..."}` becomes `{"response": {...}}`,
    /// or `{"error": ..., "status": ...}` when the request is rejected.
    pub async fn reply_json(&self, payload: &Value) -> Value {
        let query = payload.get("query").and_then(Value::as_str).unwrap_or_default();
        match self.reply(query).await {
            Ok(reply) => reply.to_json(),
            Err(err) => {
                tracing::warn!("❌ Request rejected: {}", err);
                let mut body = error_json(&err);
                body["status"] = Value::from(status_code(&err));
                body
            }
        }
    }

    /// Empty queries are rejected before any resolution work. Greetings
    /// short-circuit, local matches are formatted, and everything else goes
    /// to the generalist, whose failures come back as an apology reply.
    pub async fn reply(&self, query: &str) -> Result<ChatReply> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistantError::invalid_request(EMPTY_QUERY_MESSAGE));
        }

        if is_greeting(query) {
            tracing::debug!("👋 Greeting detected");
            return Ok(ChatReply {
                source: ReplySource::Greeting,
                response: FormattedResponse::text(self.greeting.clone()),
            });
        }

        if let Some(found) = self.orchestrator.resolve(query, &self.store) {
            return Ok(ChatReply {
                source: ReplySource::Local(found.category()),
                response: formatter::format(&found),
            });
        }

        tracing::debug!("💡 Delegating to generalist answerer");
        let (source, text) = match self.answerer.answer(query).await {
            Answer::Generated(text) => (ReplySource::Generalist, text),
            fallback @ Answer::Fallback { .. } => {
                (ReplySource::GeneralistFallback, fallback.into_text())
            }
        };
        Ok(ChatReply {
            source,
            response: FormattedResponse::text(text),
        })
    }
}

/// Wire body for a rejected request: `{"error": "..."}`.
pub fn error_json(err: &AssistantError) -> serde_json::Value {
    serde_json::json!({ "error": err.user_friendly_message() })
}

pub fn status_code(err: &AssistantError) -> u16 {
    match err.category() {
        ErrorCategory::Request => 400,
        _ => 500,
    }
}
