use crate::core::knowledge::KnowledgeStore;
use crate::domain::model::MatchResult;
use crate::utils::error::{Result, UpstreamFailure};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn college_name(&self) -> &str;
    fn greeting(&self) -> &str;
    fn knowledge_path(&self) -> &str;
    fn matching(&self) -> &crate::config::toml_config::MatchingConfig;
    fn generalist(&self) -> &crate::config::toml_config::GeneralistConfig;
}

/// Similarity strategy. Inputs are expected to be lower-cased by the caller.
pub trait FuzzyMatcher: Send + Sync {
    /// Normalised similarity in `[0, 1]`.
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// True when any candidate reaches `threshold`. The first qualifying
    /// candidate ends the scan; there is no best-of-N selection.
    fn is_close_match(&self, query: &str, candidates: &[&str], threshold: f64) -> bool {
        if query.is_empty() {
            return false;
        }
        candidates
            .iter()
            .any(|candidate| self.similarity(candidate, query) >= threshold)
    }
}

/// Everything a resolver may read while resolving one query.
/// The store and matcher borrows are independent so a match can outlive
/// the orchestrator that produced it.
pub struct ResolveContext<'s, 'm> {
    pub store: &'s KnowledgeStore,
    pub matcher: &'m dyn FuzzyMatcher,
    pub staff_threshold: f64,
    pub general_threshold: f64,
}

pub trait Resolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// `query` is already lower-cased.
    fn try_resolve<'s>(&self, query: &str, ctx: &ResolveContext<'s, '_>) -> Option<MatchResult<'s>>;
}

/// The external generalist language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_query: &str,
    ) -> std::result::Result<String, UpstreamFailure>;
}
