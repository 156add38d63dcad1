//! Command handlers for the fiscal assistant CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod health;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use health::HealthCommand;
pub use serve::ServeCommand;
