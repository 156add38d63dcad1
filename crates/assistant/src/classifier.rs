//! Domain classifier.
//!
//! Decides from the text alone whether a query is a greeting, a fiscal
//! question, or off-topic. No external calls.

use crate::keywords::{GreetingSet, KeywordSet};
use crate::query::Query;
use crate::types::Classification;

/// Keyword-based domain classifier.
#[derive(Debug, Clone, Default)]
pub struct DomainClassifier {
    greetings: GreetingSet,
    keywords: KeywordSet,
}

impl DomainClassifier {
    pub fn new(greetings: GreetingSet, keywords: KeywordSet) -> Self {
        Self {
            greetings,
            keywords,
        }
    }

    /// Greeting (exact token), InDomain (keyword substring) or OutOfDomain.
    ///
    /// Never returns `UnsupportedLanguage`; that verdict belongs to the
    /// language guard.
    pub fn classify(&self, query: &Query) -> Classification {
        let text = query.normalized_text();

        if self.greetings.is_greeting(text) {
            return Classification::Greeting;
        }

        match self.keywords.find_in(text) {
            Some(term) => {
                tracing::debug!("In-domain: matched keyword '{}'", term);
                Classification::InDomain
            }
            None => Classification::OutOfDomain,
        }
    }

    /// Whether the query is exactly a greeting token.
    pub fn is_greeting(&self, query: &Query) -> bool {
        self.greetings.is_greeting(query.normalized_text())
    }
}
