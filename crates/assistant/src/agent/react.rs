//! Tool-using reasoning agent (Thought / Action / Observation loop).

use super::parser::{parse_action, AgentAction};
use super::tool::Tool;
use super::Agent;
use async_trait::async_trait;
use fiscal_core::config::{AgentConfig, EarlyStopping, LlmSettings};
use fiscal_core::{AppError, AppResult};
use fiscal_llm::{ChatMessage, LlmClient, LlmRequest};
use fiscal_prompt::{build_agent_prompt, AgentPromptInput, PromptDefinition, ToolSpec};
use std::sync::Arc;

/// Generation stops before the model writes its own observation.
pub const STOP_SEQUENCE: &str = "Observation:";

/// Returned by the `force` early-stopping method.
pub const STOPPED_MESSAGE: &str =
    "⚠️ L'agent s'est arrêté après avoir atteint la limite d'étapes de raisonnement.";

/// Sampling and loop settings for [`ReactAgent`].
#[derive(Debug, Clone)]
pub struct ReactSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_iterations: usize,
    pub early_stopping: EarlyStopping,
    pub reference_link: String,
}

impl ReactSettings {
    pub fn from_config(llm: &LlmSettings, agent: &AgentConfig, reference_link: &str) -> Self {
        Self {
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            max_iterations: agent.max_iterations,
            early_stopping: agent.early_stopping,
            reference_link: reference_link.to_string(),
        }
    }
}

/// Agent that alternates model calls and tool calls until the model emits
/// a final answer or the iteration cap is reached.
pub struct ReactAgent {
    llm: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    tools: Vec<Arc<dyn Tool>>,
    settings: ReactSettings,
}

impl ReactAgent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        tools: Vec<Arc<dyn Tool>>,
        settings: ReactSettings,
    ) -> Self {
        Self {
            llm,
            prompt,
            tools,
            settings,
        }
    }

    fn tool_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    async fn step(
        &self,
        input: &str,
        history: &[ChatMessage],
        specs: &[ToolSpec],
        scratchpad: &str,
        stop: bool,
    ) -> AppResult<String> {
        let built = build_agent_prompt(
            &self.prompt,
            &AgentPromptInput {
                input,
                tools: specs,
                scratchpad,
                reference_link: &self.settings.reference_link,
            },
        )?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(built.system));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(built.user));

        let mut request = LlmRequest::new(messages, self.settings.model.clone())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);
        if stop {
            request = request.with_stop(STOP_SEQUENCE);
        }

        let response = self.llm.complete(&request).await?;
        tracing::debug!(
            tokens = response.usage.total_tokens,
            "{} step completed",
            self.llm.provider_name()
        );
        Ok(response.content.trim().to_string())
    }

    async fn observe(&self, tool: &str, input: &str) -> AppResult<String> {
        match self.find_tool(tool) {
            Some(t) => t.call(input).await,
            None => {
                let names: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
                tracing::warn!("Model asked for unknown tool '{}'", tool);
                Ok(format!(
                    "{} n'est pas un outil valide, essayez l'un de [{}].",
                    tool,
                    names.join(", ")
                ))
            }
        }
    }

    async fn stop_early(
        &self,
        input: &str,
        history: &[ChatMessage],
        specs: &[ToolSpec],
        scratchpad: &mut String,
    ) -> AppResult<String> {
        match self.settings.early_stopping {
            EarlyStopping::Force => Ok(STOPPED_MESSAGE.to_string()),
            EarlyStopping::Generate => {
                scratchpad.push_str("\n\n");
                scratchpad.push_str(self.prompt.final_answer_prompt.trim_end());
                let output = self.step(input, history, specs, scratchpad, false).await?;
                // Anything but a final answer is returned as written
                match parse_action(&output) {
                    Ok(AgentAction::Finish(answer)) => Ok(answer),
                    Ok(AgentAction::Call { .. }) | Err(_) => Ok(output),
                }
            }
        }
    }
}

#[async_trait]
impl Agent for ReactAgent {
    async fn invoke(&self, input: &str, history: &[ChatMessage]) -> AppResult<String> {
        if self.settings.max_iterations == 0 {
            return Err(AppError::Agent("max_iterations must be at least 1".to_string()));
        }

        let specs = self.tool_specs();
        let mut scratchpad = String::new();

        for iteration in 1..=self.settings.max_iterations {
            let output = self.step(input, history, &specs, &scratchpad, true).await?;

            match parse_action(&output) {
                Ok(AgentAction::Finish(answer)) => {
                    tracing::debug!("Final answer after {} step(s)", iteration);
                    return Ok(answer);
                }
                Ok(AgentAction::Call { tool, input: tool_input }) => {
                    let observation = self.observe(&tool, &tool_input).await?;
                    tracing::debug!("Step {}: {} -> {} chars", iteration, tool, observation.len());
                    scratchpad.push_str(&output);
                    scratchpad.push_str("\nObservation: ");
                    scratchpad.push_str(&observation);
                    scratchpad.push_str("\nThought:");
                }
                Err(e) => {
                    // Unstructured replies are taken as the answer
                    tracing::debug!("Unstructured model output ({}), returning it as is", e);
                    return Ok(output);
                }
            }
        }

        tracing::info!(
            "Iteration cap ({}) reached, early stopping: {:?}",
            self.settings.max_iterations,
            self.settings.early_stopping
        );
        self.stop_early(input, history, &specs, &mut scratchpad).await
    }
}
