//! Retrieval ranker.
//!
//! Wraps the search index with fail-open semantics: any index failure
//! degrades to empty results. Successful lookups can be kept in an LRU
//! cache keyed by normalized query text.

use crate::index::{SearchIndex, SearchRequest};
use crate::query::Query;
use crate::types::RankedResults;
use fiscal_core::{AppError, AppResult};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Default number of hits kept.
pub const DEFAULT_TOP_K: usize = 3;

/// Ranks candidate answers for in-domain queries.
pub struct RetrievalRanker {
    index: Option<Arc<dyn SearchIndex>>,
    top_k: usize,
    cache: Option<Mutex<LruCache<String, RankedResults>>>,
}

impl RetrievalRanker {
    /// `None` for `index` means the connector is disabled.
    pub fn new(index: Option<Arc<dyn SearchIndex>>, top_k: usize) -> Self {
        Self {
            index,
            top_k,
            cache: None,
        }
    }

    /// Enable the result cache. A capacity of 0 leaves it disabled.
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        self
    }

    /// Ranked hits for the query, or empty results on any failure.
    pub async fn rank(&self, query: &Query) -> RankedResults {
        if let Some(cached) = self.cached(query.normalized_text()) {
            tracing::debug!("Cache hit for '{}'", query.normalized_text());
            return cached;
        }

        match self.try_rank(query).await {
            Ok(results) => {
                for hit in results.hits() {
                    tracing::debug!(
                        score = hit.relevance_score,
                        question = %hit.source_question,
                        "Ranked hit"
                    );
                }
                self.store(query.normalized_text(), &results);
                results
            }
            Err(e) => {
                let backend = self.index.as_ref().map_or("none", |index| index.name());
                tracing::warn!(backend, "Retrieval unavailable: {}", e);
                RankedResults::empty()
            }
        }
    }

    async fn try_rank(&self, query: &Query) -> AppResult<RankedResults> {
        let index = self
            .index
            .as_ref()
            .ok_or_else(|| AppError::Search("search index connector is disabled".to_string()))?;

        let request = SearchRequest::new(query.raw_text().trim(), self.top_k);
        let hits = index.search(&request).await?;
        Ok(RankedResults::new(hits, self.top_k))
    }

    /// Ping the index; an absent connector is an error here.
    pub async fn ping(&self) -> AppResult<()> {
        match &self.index {
            Some(index) => index.ping().await,
            None => Err(AppError::Search(
                "search index connector is disabled".to_string(),
            )),
        }
    }

    /// Drop every cached result.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.clear();
                tracing::debug!("Result cache cleared");
            }
        }
    }

    fn cached(&self, key: &str) -> Option<RankedResults> {
        let cache = self.cache.as_ref()?;
        let mut cache = cache.lock().ok()?;
        cache.get(key).cloned()
    }

    fn store(&self, key: &str, results: &RankedResults) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(key.to_string(), results.clone());
            }
        }
    }
}
