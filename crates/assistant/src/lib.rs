//! Domain-restricted question answering for Senegalese taxation.
//!
//! The crate is organised leaf-first:
//! - [`language`] and [`classifier`]: pure verdicts on the query text
//! - [`index`] and [`ranker`]: weighted full-text retrieval, fail-open
//! - [`selector`]: final answer composition and fallbacks
//! - [`pipeline`]: the stages wired together, plus the health check
//! - [`agent`]: LLM agent that uses the pipeline as a tool, with
//!   per-session memory

pub mod agent;
pub mod classifier;
pub mod index;
pub mod keywords;
pub mod language;
pub mod pipeline;
pub mod query;
pub mod ranker;
pub mod selector;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use agent::{Agent, FiscalSearchTool, Orchestrator, ReactAgent, ReactSettings};
pub use classifier::DomainClassifier;
pub use index::{ElasticsearchIndex, SearchIndex, SearchRequest};
pub use keywords::{GreetingSet, KeywordSet};
pub use language::{detect_language, DetectionAmbiguous, Language, LanguageGuard};
pub use pipeline::{FiscalPipeline, HealthError};
pub use query::Query;
pub use ranker::RetrievalRanker;
pub use selector::ResponseSelector;
pub use types::{AnswerOrigin, Classification, FinalAnswer, RankedResults, SearchHit};
