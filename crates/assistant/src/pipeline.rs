//! The classification-and-retrieval pipeline.
//!
//! greeting check → language guard → domain classifier → ranker → selector.
//! Every outcome, refusals included, is a `FinalAnswer`.

use crate::classifier::DomainClassifier;
use crate::index::SearchIndex;
use crate::keywords::{GreetingSet, KeywordSet};
use crate::language::{DetectionAmbiguous, LanguageGuard, LanguageVerdict};
use crate::query::Query;
use crate::ranker::RetrievalRanker;
use crate::selector::ResponseSelector;
use crate::types::{Classification, FinalAnswer, RankedResults};
use fiscal_core::AppConfig;
use std::sync::Arc;
use thiserror::Error;

/// Query used by the health check round trip.
pub const HEALTH_CHECK_QUERY: &str = "test santé";

/// Why the service is not healthy.
#[derive(Error, Debug)]
pub enum HealthError {
    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("pipeline produced an empty answer")]
    EmptyAnswer,
}

impl HealthError {
    /// Fixed message shown to clients.
    pub fn detail(&self) -> &'static str {
        match self {
            Self::IndexUnavailable(_) => "Elasticsearch indisponible",
            Self::EmptyAnswer => "Le modèle fiscal ne répond pas correctement",
        }
    }
}

/// Fiscal question pipeline.
pub struct FiscalPipeline {
    classifier: DomainClassifier,
    guard: LanguageGuard,
    ranker: RetrievalRanker,
    selector: ResponseSelector,
}

impl FiscalPipeline {
    pub fn new(
        classifier: DomainClassifier,
        guard: LanguageGuard,
        ranker: RetrievalRanker,
        selector: ResponseSelector,
    ) -> Self {
        Self {
            classifier,
            guard,
            ranker,
            selector,
        }
    }

    /// Wire the pipeline from configuration around an index connector.
    pub fn from_config(config: &AppConfig, index: Option<Arc<dyn SearchIndex>>) -> Self {
        let keywords = KeywordSet::from_config(config.domain.keywords.as_deref());
        tracing::debug!("{} domain keywords loaded", keywords.len());
        let classifier = DomainClassifier::new(
            GreetingSet::from_config(config.domain.greetings.as_deref()),
            keywords,
        );
        let ranker =
            RetrievalRanker::new(index, config.search.top_k).with_cache(config.search.cache_capacity);

        Self::new(
            classifier,
            LanguageGuard::default(),
            ranker,
            ResponseSelector::new(config.domain.reference_link.clone()),
        )
    }

    /// Classify a query.
    ///
    /// Greetings are recognised before the language guard so that "hi" or
    /// "hello" never get a language refusal.
    pub fn classify(&self, query: &Query) -> Result<Classification, DetectionAmbiguous> {
        if self.classifier.is_greeting(query) {
            return Ok(Classification::Greeting);
        }

        match self.guard.check(query) {
            LanguageVerdict::Accepted => Ok(self.classifier.classify(query)),
            LanguageVerdict::Unsupported(_) => Ok(Classification::UnsupportedLanguage),
            LanguageVerdict::Ambiguous => Err(DetectionAmbiguous),
        }
    }

    /// The answer for queries settled without retrieval: greetings and
    /// refusals. `None` means the query is in-domain.
    pub fn screen(&self, query: &Query) -> Option<FinalAnswer> {
        match self.classify(query) {
            Err(DetectionAmbiguous) => Some(self.selector.detection_failed()),
            Ok(Classification::InDomain) => None,
            Ok(classification) => {
                Some(self.selector.select(classification, &RankedResults::empty()))
            }
        }
    }

    /// Answer one question. The index is queried only for in-domain text.
    pub async fn answer(&self, text: &str) -> FinalAnswer {
        let query = Query::new(text);

        let answer = match self.screen(&query) {
            Some(answer) => answer,
            None => {
                let results = self.ranker.rank(&query).await;
                self.selector.select(Classification::InDomain, &results)
            }
        };

        tracing::debug!(origin = ?answer.origin, "Pipeline answer");
        answer
    }

    /// Whether the query is a bare greeting.
    pub fn is_greeting(&self, text: &str) -> bool {
        self.classifier.is_greeting(&Query::new(text))
    }

    /// Ping the index, then run one round trip that must yield text.
    pub async fn health_check(&self) -> Result<(), HealthError> {
        self.ranker
            .ping()
            .await
            .map_err(|e| HealthError::IndexUnavailable(e.to_string()))?;

        let answer = self.answer(HEALTH_CHECK_QUERY).await;
        if answer.text.trim().is_empty() {
            return Err(HealthError::EmptyAnswer);
        }
        Ok(())
    }

    pub fn clear_cache(&self) {
        self.ranker.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnswerOrigin;

    fn offline() -> FiscalPipeline {
        FiscalPipeline::from_config(&AppConfig::default(), None)
    }

    #[test]
    fn test_greeting_bypasses_language_guard() {
        let pipeline = offline();
        // "hi" alone carries no language evidence
        assert_eq!(
            pipeline.classify(&Query::new("Hi")),
            Ok(Classification::Greeting)
        );
    }

    #[test]
    fn test_language_before_domain() {
        let pipeline = offline();
        assert_eq!(
            pipeline.classify(&Query::new("What is the tva rate?")),
            Ok(Classification::UnsupportedLanguage)
        );
        assert_eq!(
            pipeline.classify(&Query::new("TVA")),
            Ok(Classification::InDomain)
        );
        assert_eq!(pipeline.classify(&Query::new("2024 ?")), Err(DetectionAmbiguous));
    }

    #[test]
    fn test_screen_settles_everything_but_in_domain() {
        let pipeline = offline();
        assert_eq!(
            pipeline.screen(&Query::new("salut")).map(|a| a.origin),
            Some(AnswerOrigin::Greeting)
        );
        assert_eq!(
            pipeline.screen(&Query::new("Quel temps fait-il à Dakar ?")).map(|a| a.origin),
            Some(AnswerOrigin::OutOfDomainRefusal)
        );
        assert!(pipeline.screen(&Query::new("Comment payer la patente ?")).is_none());
    }

    #[tokio::test]
    async fn test_in_domain_without_index_falls_back() {
        let answer = offline().answer("Quel est le délai de paiement de la TVA ?").await;
        assert_eq!(answer.origin, AnswerOrigin::NoMatchFallback);
    }

    #[tokio::test]
    async fn test_ambiguous_language_answer() {
        let answer = offline().answer("2024 ?").await;
        assert_eq!(answer.origin, AnswerOrigin::LanguageRefusal);
        assert_eq!(answer.text, crate::selector::DETECTION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_health_fails_without_index() {
        let err = offline().health_check().await.unwrap_err();
        assert!(matches!(err, HealthError::IndexUnavailable(_)));
        assert_eq!(err.detail(), "Elasticsearch indisponible");
    }
}
