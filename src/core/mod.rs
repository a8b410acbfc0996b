pub mod answerer;
pub mod engine;
pub mod formatter;
pub mod fuzzy;
pub mod knowledge;
pub mod orchestrator;
pub mod resolvers;

pub use crate::domain::ports::{ConfigProvider, FuzzyMatcher, LanguageModel, Resolver, Storage};
pub use crate::utils::error::Result;
