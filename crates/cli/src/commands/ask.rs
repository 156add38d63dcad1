//! Ask command handler.
//!
//! Answers a single question and exits.

use crate::app::FiscalApp;
use clap::Args;
use fiscal_core::{config::AppConfig, AppError, AppResult};

/// Ask one fiscal question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Vec<String>,

    /// Answer from the knowledge base only, without the agent
    #[arg(long)]
    pub direct: bool,

    /// Let the agent handle questions the pipeline would refuse
    #[arg(long)]
    pub no_strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.question.join(" ");
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Validation("No question provided".to_string()));
        }

        let app = FiscalApp::build(config).await?;
        let answer = if self.direct {
            app.respond_direct(question).await
        } else {
            app.respond(question, !self.no_strict, None).await?
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            println!("{}", answer.text);
        }

        Ok(())
    }
}
