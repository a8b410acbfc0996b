use crate::domain::ports::LanguageModel;
use crate::utils::error::UpstreamFailure;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returned to the user whenever the generalist cannot answer.
pub const APOLOGY: &str =
    "Sorry, I could not get an answer from the AI service right now. Please try again later.";

pub fn default_system_prompt(college_name: &str) -> String {
    format!(
        "You are a helpful college campus assistant for {}. Your primary goal is to answer \
         user questions accurately and concisely. If the user's query is about a specific \
         detail (e.g., HOD, location, syllabus), state that you can only provide information \
         available in the college's official data. For general questions (e.g., college \
         history, ranking), use your general knowledge to provide a helpful response.",
        college_name
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Generated(String),
    Fallback { text: String, reason: UpstreamFailure },
}

impl Answer {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Answer::Fallback { .. })
    }

    pub fn into_text(self) -> String {
        match self {
            Answer::Generated(text) | Answer::Fallback { text, .. } => text,
        }
    }
}

/// Wraps a [`LanguageModel`] with a fixed persona prompt and a deadline.
/// Never fails: every upstream problem becomes [`Answer::Fallback`].
pub struct GeneralistAnswerer<M> {
    model: M,
    system_prompt: String,
    timeout: Duration,
}

impl<M: LanguageModel> GeneralistAnswerer<M> {
    pub fn new(model: M, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub async fn answer(&self, query: &str) -> Answer {
        let outcome = tokio::time::timeout(
            self.timeout,
            self.model.generate(&self.system_prompt, query),
        )
        .await
        .unwrap_or(Err(UpstreamFailure::Timeout(self.timeout)));

        match outcome {
            Ok(text) if !text.trim().is_empty() => Answer::Generated(text),
            Ok(_) => self.fallback(UpstreamFailure::Empty),
            Err(reason) => self.fallback(reason),
        }
    }

    fn fallback(&self, reason: UpstreamFailure) -> Answer {
        tracing::warn!("❌ Generalist answer failed: {}", reason);
        Answer::Fallback {
            text: APOLOGY.to_string(),
            reason,
        }
    }
}
