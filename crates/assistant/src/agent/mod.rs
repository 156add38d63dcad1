//! Conversational orchestration.
//!
//! An [`Agent`] turns a question plus prior turns into an answer. The
//! production agent is [`ReactAgent`], which calls the fiscal pipeline as a
//! tool. [`Orchestrator`] adds per-session memory on top of any agent.

pub mod memory;
pub mod orchestrator;
pub mod parser;
pub mod react;
pub mod tool;

use async_trait::async_trait;
use fiscal_core::AppResult;
use fiscal_llm::ChatMessage;

pub use memory::SessionMemory;
pub use orchestrator::Orchestrator;
pub use react::{ReactAgent, ReactSettings};
pub use tool::{FiscalSearchTool, Tool, FISCAL_TOOL_NAME};

/// Black-box answering capability.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer `input` given the earlier turns of the conversation.
    async fn invoke(&self, input: &str, history: &[ChatMessage]) -> AppResult<String>;
}
