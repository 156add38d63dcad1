//! LLM integration crate for the fiscal assistant.
//!
//! This crate provides a provider-agnostic abstraction for chat-completion
//! models. The conversational agent only ever talks to the [`LlmClient`]
//! trait; concrete providers are picked by [`create_client`].
//!
//! # Providers
//! - **Groq**: hosted, OpenAI-compatible chat completions (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use fiscal_llm::{ChatMessage, LlmClient, LlmRequest, providers::GroqClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new("gsk_...");
//! let request = LlmRequest::new(vec![ChatMessage::user("Bonjour")], "llama3-70b-8192");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GroqClient, OllamaClient};
pub use types::{ChatMessage, ChatRole, ProviderType};
