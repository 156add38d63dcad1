//! Fiscal Assistant CLI
//!
//! Main entry point for the fiscal command-line tool.
//! Serves the HTTP API and provides console access to the assistant.

mod app;
mod commands;
mod server;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, HealthCommand, ServeCommand};
use fiscal_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Senegalese fiscal assistant - domain-restricted question answering
#[derive(Parser, Debug)]
#[command(name = "fiscal")]
#[command(about = "Senegalese fiscal assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "FISCAL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// LLM provider (groq, ollama)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API
    Serve(ServeCommand),

    /// Ask one fiscal question
    Ask(AskCommand),

    /// Interactive console session
    Chat(ChatCommand),

    /// Check the search index and the pipeline
    Health(HealthCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, config file, .env and environment
    let config = AppConfig::load(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.log_json,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    config.validate()?;

    // Log startup
    tracing::info!("Fiscal assistant starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Index: {} ({})", config.search.index, config.search.endpoint);
    tracing::debug!("Provider: {}", config.llm.provider);
    tracing::debug!("Model: {}", config.llm.model);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Health(_) => "health",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Health(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
