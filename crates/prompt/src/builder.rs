//! Prompt builder for rendering the agent's messages.

use crate::types::{AgentPromptInput, BuiltPrompt, PromptDefinition};
use fiscal_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

/// Build the agent's system and user messages for one reasoning step.
///
/// This function:
/// 1. Renders the instruction (it may quote the reference link)
/// 2. Renders the system template with the instruction and tool list
/// 3. Renders the user template with the question and the scratchpad
///
/// # Example
/// ```no_run
/// use fiscal_prompt::{build_agent_prompt, builtin_prompt, AgentPromptInput, ToolSpec};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_prompt()?;
/// let tools = vec![ToolSpec { name: "BaseFiscalePremium".into(), description: "...".into() }];
/// let built = build_agent_prompt(&def, &AgentPromptInput {
///     input: "Comment obtenir un quitus fiscal ?",
///     tools: &tools,
///     scratchpad: "",
///     reference_link: "https://www.dgid.sn/procedures-fiscales/",
/// })?;
/// println!("{}", built.system);
/// # Ok(())
/// # }
/// ```
pub fn build_agent_prompt(
    definition: &PromptDefinition,
    vars: &AgentPromptInput<'_>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let instruction = render_template(
        &definition.instruction,
        &json!({ "referenceLink": vars.reference_link }),
    )?;

    let tool_names = vars
        .tools
        .iter()
        .map(|t| format!("\"{}\"", t.name))
        .collect::<Vec<_>>()
        .join(", ");

    let system = render_template(
        &definition.system_template,
        &json!({
            "instruction": instruction.trim_end(),
            "tools": vars.tools,
            "toolNames": tool_names,
        }),
    )?;

    let user = render_template(
        &definition.user_template,
        &json!({
            "input": vars.input,
            "scratchpad": vars.scratchpad,
        }),
    )?;

    Ok(BuiltPrompt {
        system: system.trim_end().to_string(),
        user: user.trim_end().to_string(),
        source_prompt_id: definition.id.clone(),
    })
}

/// Render a Handlebars template with variables.
fn render_template<T: Serialize>(template: &str, data: &T) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .render_template(template, data)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::builtin_prompt;
    use crate::types::ToolSpec;

    fn tools() -> Vec<ToolSpec> {
        vec![ToolSpec {
            name: "BaseFiscalePremium".to_string(),
            description: "Recherche dans la base fiscale".to_string(),
        }]
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{prompt}}", &json!({"prompt": "TVA & IS"}));
        // No HTML escaping
        assert_eq!(result.unwrap(), "Question: TVA & IS");
    }

    #[test]
    fn test_render_template_missing_variable() {
        // Handlebars renders missing variables as empty string
        let result = render_template("Question: {{missing}}", &json!({}));
        assert_eq!(result.unwrap(), "Question: ");
    }

    #[test]
    fn test_build_prompt_with_builtin_definition() {
        let def = builtin_prompt().unwrap();
        let tools = tools();
        let built = build_agent_prompt(
            &def,
            &AgentPromptInput {
                input: "Comment obtenir un quitus fiscal ?",
                tools: &tools,
                scratchpad: "",
                reference_link: "https://www.dgid.sn/procedures-fiscales/",
            },
        )
        .unwrap();

        assert!(built.system.contains("BaseFiscalePremium : Recherche dans la base fiscale"));
        assert!(built.system.contains("\"Final Answer\" ou \"BaseFiscalePremium\""));
        // Reference link rendered inside the instruction
        assert!(built.system.contains("Consultez https://www.dgid.sn/procedures-fiscales/"));
        assert!(built.user.starts_with("Comment obtenir un quitus fiscal ?"));
        assert_eq!(built.source_prompt_id, "agent.fiscal.default");
    }

    #[test]
    fn test_scratchpad_is_appended_to_user_message() {
        let def = builtin_prompt().unwrap();
        let tools = tools();
        let built = build_agent_prompt(
            &def,
            &AgentPromptInput {
                input: "Délai de paiement de la patente ?",
                tools: &tools,
                scratchpad: "Observation: avant le 31 mars\nThought:",
                reference_link: "https://www.dgid.sn",
            },
        )
        .unwrap();

        assert!(built.user.ends_with("Observation: avant le 31 mars\nThought:"));
    }
}
