use crate::index::{SearchIndex, SearchRequest};
use crate::pipeline::FiscalPipeline;
use crate::types::SearchHit;
use async_trait::async_trait;
use fiscal_core::{AppConfig, AppError, AppResult};
use fiscal_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory index returning fixed hits and counting searches.
pub struct StubIndex {
    hits: Vec<SearchHit>,
    fail: bool,
    searches: AtomicUsize,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StubIndex {
    pub fn with_hits(hits: &[(&str, &str, f64)]) -> Arc<Self> {
        Arc::new(Self {
            hits: hits
                .iter()
                .map(|(question, answer, score)| SearchHit {
                    answer_text: answer.to_string(),
                    relevance_score: *score,
                    source_question: question.to_string(),
                })
                .collect(),
            fail: false,
            searches: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            hits: Vec::new(),
            fail: true,
            searches: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SearchIndex for StubIndex {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<SearchHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(AppError::Search("timed out".to_string()));
        }
        Ok(self.hits.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        if self.fail {
            Err(AppError::Search("timed out".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn pipeline_over(index: Arc<StubIndex>) -> FiscalPipeline {
    let index: Arc<dyn SearchIndex> = index;
    FiscalPipeline::from_config(&AppConfig::default(), Some(index))
}

/// LLM stand-in replaying canned replies in order (the last one repeats).
pub struct ScriptedLlm {
    replies: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            next: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        let content = self
            .replies
            .get(i)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_default();
        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}
