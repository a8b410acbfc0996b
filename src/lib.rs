pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::GeminiModel;
pub use config::AssistantConfig;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LocalStorage};

#[cfg(feature = "lambda")]
pub use config::{LambdaConfig, S3Storage};

pub use crate::core::{
    answerer::{Answer, GeneralistAnswerer},
    engine::AssistantEngine,
    knowledge::KnowledgeStore,
    orchestrator::Orchestrator,
};
pub use domain::model::{ChatReply, FormattedResponse, MatchResult, ReplySource};
pub use utils::error::{AssistantError, Result};
