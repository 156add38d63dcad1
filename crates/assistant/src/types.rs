//! Assistant type definitions.

use serde::{Deserialize, Serialize};

/// Verdict of the classification stages for one query.
///
/// Exactly one value per query; the verdict alone drives branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Greeting,
    InDomain,
    OutOfDomain,
    UnsupportedLanguage,
}

/// One hit returned by the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Curated answer text
    pub answer_text: String,

    /// Relevance score assigned by the index
    pub relevance_score: f64,

    /// Question the answer was written for (diagnostics only)
    pub source_question: String,
}

/// Hits ordered by relevance score, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResults {
    hits: Vec<SearchHit>,
}

impl RankedResults {
    /// Sort hits by descending score and keep the first `top_k`.
    pub fn new(mut hits: Vec<SearchHit>, top_k: usize) -> Self {
        hits.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        hits.truncate(top_k);
        Self { hits }
    }

    /// No results, score 0.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn top(&self) -> Option<&SearchHit> {
        self.hits.first()
    }

    /// Score of the first hit, or 0 when there are none.
    pub fn best_score(&self) -> f64 {
        self.top().map(|h| h.relevance_score).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

/// Where a final answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    Greeting,
    Retrieved,
    NoMatchFallback,
    OutOfDomainRefusal,
    LanguageRefusal,
    AgentGenerated,
}

impl AnswerOrigin {
    /// Refusals are terminal: the agent is never consulted for them in strict mode.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::OutOfDomainRefusal | Self::LanguageRefusal)
    }
}

/// The user-facing answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub text: String,
    pub origin: AnswerOrigin,
}

impl FinalAnswer {
    pub fn new(text: impl Into<String>, origin: AnswerOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }
}
