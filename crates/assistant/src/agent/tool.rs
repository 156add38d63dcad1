//! Tools the agent can call.

use crate::pipeline::FiscalPipeline;
use async_trait::async_trait;
use fiscal_core::AppResult;
use fiscal_prompt::ToolSpec;
use std::sync::Arc;

/// Name under which the fiscal pipeline is registered.
pub const FISCAL_TOOL_NAME: &str = "BaseFiscalePremium";

const FISCAL_TOOL_DESCRIPTION: &str = "🔍 Outil strictement limité à la fiscalité sénégalaise. \
    Répondez uniquement en français, même si le modèle produit une réponse en anglais : traduisez-la en français. \
    Ne répond qu'aux questions sur les impôts, taxes, déclarations, procédures fiscales et textes de loi. \
    Renvoie systématiquement vers https://www.dgid.sn/procedures-fiscales/ pour les questions non fiscales.";

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn call(&self, input: &str) -> AppResult<String>;

    /// Name and description as rendered in the prompt.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// Exposes the fiscal pipeline to the agent.
pub struct FiscalSearchTool {
    pipeline: Arc<FiscalPipeline>,
}

impl FiscalSearchTool {
    pub fn new(pipeline: Arc<FiscalPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Tool for FiscalSearchTool {
    fn name(&self) -> &str {
        FISCAL_TOOL_NAME
    }

    fn description(&self) -> &str {
        FISCAL_TOOL_DESCRIPTION
    }

    async fn call(&self, input: &str) -> AppResult<String> {
        tracing::debug!("{} called with: {}", FISCAL_TOOL_NAME, input);
        Ok(self.pipeline.answer(input).await.text)
    }
}
