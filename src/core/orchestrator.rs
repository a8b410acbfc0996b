use crate::core::fuzzy::MatchAlgorithm;
use crate::core::knowledge::KnowledgeStore;
use crate::core::resolvers::RESOLUTION_ORDER;
use crate::domain::model::MatchResult;
use crate::domain::ports::{FuzzyMatcher, ResolveContext, Resolver};

pub const DEFAULT_STAFF_THRESHOLD: f64 = 0.7;
pub const DEFAULT_GENERAL_THRESHOLD: f64 = 0.6;

/// Runs the resolvers in priority order against an immutable store.
pub struct Orchestrator {
    resolvers: Vec<Box<dyn Resolver>>,
    matcher: Box<dyn FuzzyMatcher>,
    staff_threshold: f64,
    general_threshold: f64,
}

impl Orchestrator {
    pub fn new(matcher: Box<dyn FuzzyMatcher>, staff_threshold: f64, general_threshold: f64) -> Self {
        Self {
            resolvers: RESOLUTION_ORDER.iter().map(|kind| kind.build()).collect(),
            matcher,
            staff_threshold,
            general_threshold,
        }
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// First local match for `query`, or `None` when the generalist should answer.
    pub fn resolve<'s>(&self, query: &str, store: &'s KnowledgeStore) -> Option<MatchResult<'s>> {
        let query = query.to_lowercase();
        let ctx = ResolveContext {
            store,
            matcher: self.matcher.as_ref(),
            staff_threshold: self.staff_threshold,
            general_threshold: self.general_threshold,
        };

        for resolver in &self.resolvers {
            if let Some(found) = resolver.try_resolve(&query, &ctx) {
                tracing::debug!("🎯 Resolver '{}' matched ({})", resolver.name(), found.category());
                return Some(found);
            }
        }

        tracing::debug!("No local match for query");
        None
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(
            MatchAlgorithm::default().build(),
            DEFAULT_STAFF_THRESHOLD,
            DEFAULT_GENERAL_THRESHOLD,
        )
    }
}
