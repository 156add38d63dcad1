//! Elasticsearch connector.
//!
//! Talks to the `_search` endpoint of a single index over HTTP(S) with basic
//! auth. Hits are read from `hits.hits[]` (`_score`, `_source.question`,
//! `_source.reponse`).

use super::{SearchIndex, SearchRequest};
use crate::types::SearchHit;
use async_trait::async_trait;
use fiscal_core::config::SearchConfig;
use fiscal_core::{AppError, AppResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Debug, Deserialize)]
struct HitSource {
    #[serde(default)]
    question: String,
    reponse: String,
}

impl From<RawHit> for SearchHit {
    fn from(raw: RawHit) -> Self {
        SearchHit {
            answer_text: raw.source.reponse,
            relevance_score: raw.score.unwrap_or(0.0),
            source_question: raw.source.question,
        }
    }
}

/// Elasticsearch index client.
#[derive(Debug, Clone)]
pub struct ElasticsearchIndex {
    client: Client,
    endpoint: String,
    index: String,
    credentials: Option<(String, String)>,
}

impl ElasticsearchIndex {
    /// Build a client without contacting the cluster.
    pub fn new(config: &SearchConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| AppError::Search(format!("Failed to create HTTP client: {}", e)))?;

        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            credentials,
        })
    }

    /// Build a client and ping the cluster.
    ///
    /// Returns `None` (connector disabled) when credentials are missing or
    /// the cluster does not answer. A missing index only logs a warning.
    pub async fn connect(config: &SearchConfig) -> Option<Self> {
        if !config.has_credentials() {
            warn!(
                "Index credentials missing (${} / ${}), search disabled",
                config.username_env, config.password_env
            );
            return None;
        }

        let index = match Self::new(config) {
            Ok(index) => index,
            Err(e) => {
                warn!("{}, search disabled", e);
                return None;
            }
        };

        if let Err(e) = index.ping().await {
            warn!("Cannot reach {}: {}, search disabled", index.endpoint, e);
            return None;
        }

        match index.index_exists().await {
            Ok(true) => debug!("Index '{}' found", index.index),
            Ok(false) => warn!("Index '{}' does not exist yet", index.index),
            Err(e) => warn!("Could not check index '{}': {}", index.index, e),
        }

        tracing::info!("Connected to Elasticsearch at {}", index.endpoint);
        Some(index)
    }

    /// `HEAD /<index>`: 200 when present, 404 when absent.
    pub async fn index_exists(&self) -> AppResult<bool> {
        let url = format!("{}/{}", self.endpoint, self.index);
        let response = self
            .authorize(self.client.head(&url))
            .send()
            .await
            .map_err(|e| AppError::Search(format!("HEAD {} failed: {}", url, e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(AppError::Search(format!("HEAD {} returned {}", url, status))),
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, Some(password)),
            None => builder,
        }
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    #[instrument(skip(self, request), fields(index = %self.index))]
    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<SearchHit>> {
        let url = format!("{}/{}/_search", self.endpoint, self.index);
        let response = self
            .authorize(self.client.post(&url))
            .json(&request.to_query_body())
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Search returned {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Malformed search response: {}", e)))?;

        Ok(parsed.hits.hits.into_iter().map(SearchHit::from).collect())
    }

    async fn ping(&self) -> AppResult<()> {
        let url = format!("{}/", self.endpoint);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Ping failed: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Search(format!("Ping returned {}", response.status())))
        }
    }
}
