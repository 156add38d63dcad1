//! Configuration management for the fiscal assistant.
//!
//! This module handles loading and merging configuration from multiple sources,
//! in increasing order of precedence:
//! - Built-in defaults
//! - A YAML config file (`--config`, `FISCAL_CONFIG`, or `./fiscal.yaml`)
//! - Environment variables (a `.env` file is loaded first when present)
//! - Command-line flags
//!
//! Secrets (index credentials, LLM API key) are never read from the YAML file
//! directly. The file names the environment variables that hold them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fiscal.yaml";

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["groq", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,

    /// Search index connection
    pub search: SearchConfig,

    /// LLM provider settings
    pub llm: LlmSettings,

    /// Conversational agent settings
    pub agent: AgentConfig,

    /// Domain vocabulary and refusal link
    pub domain: DomainConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

/// Search index (Elasticsearch) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Base URL of the index cluster
    pub endpoint: String,

    /// Index holding the curated question/answer pairs
    pub index: String,

    /// Environment variable holding the username
    pub username_env: String,

    /// Environment variable holding the password
    pub password_env: String,

    /// Resolved username
    #[serde(skip)]
    pub username: Option<String>,

    /// Resolved password
    #[serde(skip)]
    pub password: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Skip TLS certificate verification (self-signed clusters, tunnels)
    pub accept_invalid_certs: bool,

    /// Number of hits requested from the index
    pub top_k: usize,

    /// Capacity of the per-query result cache (0 disables it)
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:9200".to_string(),
            index: "assistant_fiscal_v2".to_string(),
            username_env: "ELASTIC_USER".to_string(),
            password_env: "ELASTIC_PASSWORD".to_string(),
            username: None,
            password: None,
            timeout_secs: 45,
            accept_invalid_certs: true,
            top_k: 3,
            cache_capacity: 0,
        }
    }
}

impl SearchConfig {
    /// Whether both credentials were resolved.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmSettings {
    /// Provider identifier ("groq" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Optional custom endpoint URL
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Resolved API key
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,

    /// Maximum tokens generated per completion
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama3-70b-8192".to_string(),
            endpoint: None,
            api_key_env: "GROQ_API_KEY".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 1500,
            timeout_secs: 60,
        }
    }
}

/// What the agent does when it reaches its iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarlyStopping {
    /// Return a fixed "stopped" message
    Force,
    /// Make one last LLM call that must produce the final answer
    Generate,
}

impl EarlyStopping {
    /// Parse an early-stopping method name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "force" => Some(Self::Force),
            "generate" => Some(Self::Generate),
            _ => None,
        }
    }
}

/// Conversational agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Maximum reasoning iterations (tool calls) per invocation
    pub max_iterations: usize,

    /// Behaviour once the iteration cap is reached
    pub early_stopping: EarlyStopping,

    /// Messages kept per conversation session (0 keeps everything)
    pub max_history: usize,

    /// Conversation sessions kept in memory; the least recently used is
    /// evicted beyond this
    pub max_sessions: usize,

    /// Optional YAML prompt definition replacing the built-in one
    pub prompt_file: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 4,
            early_stopping: EarlyStopping::Generate,
            max_history: 20,
            max_sessions: 1000,
            prompt_file: None,
        }
    }
}

/// Domain vocabulary configuration.
///
/// `None` means "use the built-in set".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainConfig {
    /// Greeting tokens answered without touching the index
    pub greetings: Option<Vec<String>>,

    /// Domain-indicator terms
    pub keywords: Option<Vec<String>>,

    /// Link appended to refusals and fallbacks
    pub reference_link: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            greetings: None,
            keywords: None,
            reference_link: "https://www.dgid.sn/procedures-fiscales/".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    search: Option<SearchConfig>,
    llm: Option<LlmSettings>,
    agent: Option<AgentConfig>,
    domain: Option<DomainConfig>,
    server: Option<ServerConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
            search: SearchConfig::default(),
            llm: LlmSettings::default(),
            agent: AgentConfig::default(),
            domain: DomainConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, `.env` and the environment.
    ///
    /// Environment variables:
    /// - `FISCAL_CONFIG`: Path to config file (when `config_file` is `None`)
    /// - `FISCAL_SEARCH_ENDPOINT`, `FISCAL_SEARCH_INDEX`: Index location
    /// - `FISCAL_PROVIDER`, `FISCAL_MODEL`, `FISCAL_LLM_ENDPOINT`: LLM selection
    /// - `FISCAL_BIND`: HTTP bind address
    /// - `FISCAL_EARLY_STOPPING`: Agent early-stopping method ("force" or "generate")
    /// - `ELASTIC_USER`, `ELASTIC_PASSWORD`, `GROQ_API_KEY`: Secrets (names configurable)
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    /// - `FISCAL_LOG_JSON`: Emit JSON logs
    ///
    /// # Example
    /// ```no_run
    /// use fiscal_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Index: {}", config.search.index);
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        // A missing .env file is the normal case in production
        dotenv::dotenv().ok();

        let mut config = Self::default();

        let explicit = config_file.or_else(|| std::env::var("FISCAL_CONFIG").ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config = config.merge_yaml(&path)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut result = self.merge_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        result.config_file = Some(path.to_path_buf());

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;

        let mut result = self.clone();

        if let Some(search) = config_file.search {
            result.search = search;
        }
        if let Some(llm) = config_file.llm {
            result.llm = llm;
        }
        if let Some(agent) = config_file.agent {
            result.agent = agent;
        }
        if let Some(domain) = config_file.domain {
            result.domain = domain;
        }
        if let Some(server) = config_file.server {
            result.server = server;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        Ok(result)
    }

    /// Apply environment overrides and resolve secrets.
    ///
    /// The lookup is injected so tests never touch the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("FISCAL_SEARCH_ENDPOINT") {
            self.search.endpoint = endpoint;
        }
        if let Some(index) = lookup("FISCAL_SEARCH_INDEX") {
            self.search.index = index;
        }
        if let Some(provider) = lookup("FISCAL_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Some(model) = lookup("FISCAL_MODEL") {
            self.llm.model = model;
        }
        if let Some(endpoint) = lookup("FISCAL_LLM_ENDPOINT") {
            self.llm.endpoint = Some(endpoint);
        }
        if let Some(bind) = lookup("FISCAL_BIND") {
            self.server.bind = bind;
        }
        if let Some(method) = lookup("FISCAL_EARLY_STOPPING") {
            match EarlyStopping::parse(&method) {
                Some(parsed) => self.agent.early_stopping = parsed,
                None => tracing::warn!("Ignoring unknown early-stopping method: {}", method),
            }
        }

        self.search.username = lookup(&self.search.username_env).filter(|v| !v.is_empty());
        self.search.password = lookup(&self.search.password_env).filter(|v| !v.is_empty());
        self.llm.api_key = lookup(&self.llm.api_key_env).filter(|v| !v.is_empty());

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }
        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }
        if let Some(json) = lookup("FISCAL_LOG_JSON") {
            self.log_json = matches!(json.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the environment and the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.llm.provider = provider;
        }

        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        self
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.llm.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.search.top_k == 0 {
            return Err(AppError::Config("search.topK must be at least 1".to_string()));
        }

        if self.agent.max_sessions == 0 {
            return Err(AppError::Config(
                "agent.maxSessions must be at least 1".to_string(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(AppError::Config(
                "agent.maxIterations must be at least 1".to_string(),
            ));
        }

        if let Some(ref greetings) = self.domain.greetings {
            if greetings.iter().all(|g| g.trim().is_empty()) {
                return Err(AppError::Config("domain.greetings is empty".to_string()));
            }
        }

        if let Some(ref keywords) = self.domain.keywords {
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(AppError::Config("domain.keywords is empty".to_string()));
            }
        }

        Ok(())
    }
}
