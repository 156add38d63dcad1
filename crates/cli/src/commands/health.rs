//! Health command handler.
//!
//! Runs the same checks as `GET /sante` once and reports the outcome.

use crate::app::FiscalApp;
use clap::Args;
use fiscal_core::{config::AppConfig, AppError, AppResult};

/// Check the search index and run one pipeline round trip
#[derive(Args, Debug)]
pub struct HealthCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HealthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing health command");

        let app = FiscalApp::build(config).await?;
        let result = app.health().await;

        if self.json {
            let output = match &result {
                Ok(()) => serde_json::json!({ "status": "ok" }),
                Err(e) => serde_json::json!({ "detail": e.detail() }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            match &result {
                Ok(()) => println!("ok"),
                Err(e) => println!("{}", e.detail()),
            }
        }

        result.map_err(|e| AppError::Search(e.to_string()))
    }
}
