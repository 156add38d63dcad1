//! Prompt types for the fiscal assistant agent.

use serde::{Deserialize, Serialize};

/// An agent prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Behavioural instruction (rules, tone, answer structure)
    pub instruction: String,

    /// Handlebars template for the system message
    #[serde(rename = "systemTemplate")]
    pub system_template: String,

    /// Handlebars template for the user message
    #[serde(rename = "userTemplate")]
    pub user_template: String,

    /// Appended to the scratchpad when the iteration cap forces a final answer
    #[serde(rename = "finalAnswerPrompt")]
    pub final_answer_prompt: String,
}

/// A tool exposed to the agent, as shown in the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
}

/// Variables for one agent prompt rendering.
#[derive(Debug, Clone)]
pub struct AgentPromptInput<'a> {
    /// The user's question
    pub input: &'a str,

    /// Tools the agent may call
    pub tools: &'a [ToolSpec],

    /// Previous Thought/Action/Observation steps of this invocation
    pub scratchpad: &'a str,

    /// Link quoted in refusals
    pub reference_link: &'a str,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message
    pub system: String,

    /// User message
    pub user: String,

    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,
}
