//! Prompt system for the fiscal assistant agent.
//!
//! This crate provides:
//! - YAML-based prompt definitions (a built-in one plus an optional override file)
//! - Handlebars rendering of the agent's system and user messages
//! - Tool descriptions and the agent scratchpad injected into the templates

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_agent_prompt;
pub use loader::{builtin_prompt, load_prompt, load_prompt_or_builtin};
pub use types::{AgentPromptInput, BuiltPrompt, PromptDefinition, ToolSpec};
