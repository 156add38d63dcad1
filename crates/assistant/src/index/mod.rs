//! Search index abstraction for the curated question/answer base.
//!
//! Defines a trait for the external full-text index and the weighted
//! best-fields query sent to it.

pub mod elasticsearch;

use crate::types::SearchHit;
use async_trait::async_trait;
use fiscal_core::AppResult;
use serde_json::{json, Value};

pub use elasticsearch::ElasticsearchIndex;

/// A field searched by the multi-field query, with its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBoost {
    pub field: &'static str,
    pub boost: u32,
}

impl FieldBoost {
    pub const fn new(field: &'static str, boost: u32) -> Self {
        Self { field, boost }
    }

    /// `field^boost`, or the bare field name for weight 1.
    pub fn to_query_field(&self) -> String {
        if self.boost == 1 {
            self.field.to_string()
        } else {
            format!("{}^{}", self.field, self.boost)
        }
    }
}

/// Question weighs 3, answer 2, tags 1.
pub const DEFAULT_FIELDS: [FieldBoost; 3] = [
    FieldBoost::new("question", 3),
    FieldBoost::new("reponse", 2),
    FieldBoost::new("tags", 1),
];

/// One ranked search against the index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub text: String,
    pub fields: Vec<FieldBoost>,
    pub size: usize,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>, size: usize) -> Self {
        Self {
            text: text.into(),
            fields: DEFAULT_FIELDS.to_vec(),
            size,
        }
    }

    /// Query DSL body: a single best-fields multi_match inside a bool/must.
    pub fn to_query_body(&self) -> Value {
        let fields: Vec<String> = self.fields.iter().map(FieldBoost::to_query_field).collect();
        json!({
            "query": {
                "bool": {
                    "must": [
                        {
                            "multi_match": {
                                "query": self.text,
                                "fields": fields,
                                "type": "best_fields"
                            }
                        }
                    ]
                }
            },
            "size": self.size
        })
    }
}

/// Trait for full-text index backends.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Run one search; hits come back in the backend's order.
    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<SearchHit>>;

    /// Check that the backend answers.
    async fn ping(&self) -> AppResult<()>;
}
