//! Prompt loader for YAML prompt definitions.

use crate::types::PromptDefinition;
use fiscal_core::{AppError, AppResult};
use std::path::Path;

/// The prompt definition compiled into the binary.
const BUILTIN_PROMPT: &str = include_str!("../prompts/agent.fiscal.yml");

/// Parse the built-in agent prompt definition.
pub fn builtin_prompt() -> AppResult<PromptDefinition> {
    parse_prompt(BUILTIN_PROMPT, "built-in prompt")
}

/// Load a prompt definition from a YAML file.
///
/// # Example
/// ```no_run
/// use fiscal_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("prompts/agent.yml"))?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!("Prompt file not found: {:?}", path)));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let definition = parse_prompt(&contents, &format!("{:?}", path))?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load the prompt at `path` when given, the built-in one otherwise.
pub fn load_prompt_or_builtin(path: Option<&Path>) -> AppResult<PromptDefinition> {
    match path {
        Some(path) => load_prompt(path),
        None => builtin_prompt(),
    }
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e))
    })?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.system_template.trim().is_empty() || def.user_template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt templates cannot be empty".to_string(),
        ));
    }

    // Validate API version format (simple check)
    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // The user template must carry the question, or the agent never sees it
    if !def.user_template.contains("{{input}}") {
        return Err(AppError::Prompt(format!(
            "Prompt {} userTemplate must reference {{{{input}}}}",
            def.id
        )));
    }

    Ok(())
}
