//! Serve command handler.
//!
//! Runs the HTTP API until Ctrl-C.

use crate::app::FiscalApp;
use crate::server;
use clap::Args;
use fiscal_core::{config::AppConfig, AppResult};
use std::sync::Arc;

/// Start the HTTP API
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind (overrides server.bind)
    #[arg(short, long, env = "FISCAL_BIND")]
    pub bind: Option<String>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let bind = self.bind.as_deref().unwrap_or(&config.server.bind);
        let app = Arc::new(FiscalApp::build(config).await?);
        if !app.has_agent() {
            tracing::warn!("No LLM configured, /fiscalite answers come straight from the knowledge base");
        }

        server::serve(app, bind).await
    }
}
