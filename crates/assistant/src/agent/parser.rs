//! Parsing of the agent's JSON action blocks.

use fiscal_core::{AppError, AppResult};
use serde_json::Value;

/// Action name that ends the reasoning loop.
pub const FINAL_ANSWER_ACTION: &str = "Final Answer";

/// One step decided by the model.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentAction {
    /// Call a tool with the given input.
    Call { tool: String, input: String },
    /// Stop and answer.
    Finish(String),
}

/// Parse the action block from a model reply.
///
/// The block is the first fenced code block (with or without a `json` tag)
/// or, failing that, the outermost `{ ... }` span.
pub fn parse_action(text: &str) -> AppResult<AgentAction> {
    let block = extract_block(text)
        .ok_or_else(|| AppError::Agent("no action block in model output".to_string()))?;

    let value: Value = serde_json::from_str(block)
        .map_err(|e| AppError::Agent(format!("invalid action JSON: {}", e)))?;

    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Agent("action block has no \"action\" key".to_string()))?;

    let input = match value.get("action_input") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    if action == FINAL_ANSWER_ACTION {
        Ok(AgentAction::Finish(input))
    } else {
        Ok(AgentAction::Call {
            tool: action.to_string(),
            input,
        })
    }
}

fn extract_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return Some(inner);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_call_in_fence() {
        let text = "Thought: je dois chercher\nAction:\n```json\n{\n  \"action\": \"BaseFiscalePremium\",\n  \"action_input\": \"quitus fiscal\"\n}\n```";
        assert_eq!(
            parse_action(text).unwrap(),
            AgentAction::Call {
                tool: "BaseFiscalePremium".to_string(),
                input: "quitus fiscal".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_final_answer_without_fence() {
        let text = r#"{"action": "Final Answer", "action_input": "Voici la réponse."}"#;
        assert_eq!(
            parse_action(text).unwrap(),
            AgentAction::Finish("Voici la réponse.".to_string())
        );
    }

    #[test]
    fn test_non_string_input_is_serialized() {
        let text = r#"```
{"action": "BaseFiscalePremium", "action_input": {"query": "tva"}}
```"#;
        match parse_action(text).unwrap() {
            AgentAction::Call { input, .. } => assert_eq!(input, r#"{"query":"tva"}"#),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_is_an_error() {
        assert!(parse_action("Bonjour, je suis votre assistant.").is_err());
        assert!(parse_action(r#"{"input": "no action key"}"#).is_err());
    }
}
