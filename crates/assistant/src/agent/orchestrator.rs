//! Facade over an agent with per-session conversation memory.

use super::{Agent, SessionMemory};
use fiscal_core::AppResult;
use std::sync::Arc;

pub struct Orchestrator {
    agent: Arc<dyn Agent>,
    memory: SessionMemory,
}

impl Orchestrator {
    pub fn new(agent: Arc<dyn Agent>, memory: SessionMemory) -> Self {
        Self { agent, memory }
    }

    /// Run the agent.
    ///
    /// With a session id, that session's history is passed to the agent and
    /// the exchange is appended afterwards. Without one the call is
    /// stateless.
    pub async fn invoke(&self, input: &str, session: Option<&str>) -> AppResult<String> {
        let history = match session {
            Some(id) => self.memory.history(id).await,
            None => Vec::new(),
        };

        tracing::debug!(
            session = session.unwrap_or("-"),
            turns = history.len(),
            "Invoking agent"
        );
        let output = self.agent.invoke(input, &history).await?;

        if let Some(id) = session {
            self.memory.record(id, input, &output).await;
        }
        Ok(output)
    }

    pub async fn reset_session(&self, session: &str) {
        self.memory.clear(session).await;
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fiscal_core::AppError;
    use fiscal_llm::ChatMessage;

    /// Reports how many earlier messages it was given.
    struct CountingAgent;

    #[async_trait]
    impl Agent for CountingAgent {
        async fn invoke(&self, input: &str, history: &[ChatMessage]) -> AppResult<String> {
            Ok(format!("{}:{}", input, history.len()))
        }
    }

    fn memory() -> SessionMemory {
        SessionMemory::new(20, 100)
    }

    struct FailingAgent;

    #[async_trait]
    impl Agent for FailingAgent {
        async fn invoke(&self, _input: &str, _history: &[ChatMessage]) -> AppResult<String> {
            Err(AppError::Llm("provider unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_session_history_is_threaded() {
        let orchestrator = Orchestrator::new(Arc::new(CountingAgent), memory());

        assert_eq!(orchestrator.invoke("q1", Some("s1")).await.unwrap(), "q1:0");
        assert_eq!(orchestrator.invoke("q2", Some("s1")).await.unwrap(), "q2:2");
        // other sessions start fresh
        assert_eq!(orchestrator.invoke("q1", Some("s2")).await.unwrap(), "q1:0");
    }

    #[tokio::test]
    async fn test_no_session_is_stateless() {
        let orchestrator = Orchestrator::new(Arc::new(CountingAgent), memory());
        orchestrator.invoke("q1", None).await.unwrap();
        assert_eq!(orchestrator.invoke("q2", None).await.unwrap(), "q2:0");
        assert_eq!(orchestrator.memory().session_count().await, 0);
    }

    #[tokio::test]
    async fn test_reset_session() {
        let orchestrator = Orchestrator::new(Arc::new(CountingAgent), memory());
        orchestrator.invoke("q1", Some("s")).await.unwrap();
        orchestrator.reset_session("s").await;
        assert_eq!(orchestrator.invoke("q2", Some("s")).await.unwrap(), "q2:0");
    }

    #[tokio::test]
    async fn test_failures_are_not_recorded() {
        let orchestrator = Orchestrator::new(Arc::new(FailingAgent), memory());
        assert!(orchestrator.invoke("q", Some("s")).await.is_err());
        assert!(orchestrator.memory().history("s").await.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_sessions_do_not_accumulate() {
        let orchestrator =
            Orchestrator::new(Arc::new(CountingAgent), SessionMemory::new(20, 16));
        for i in 0..500 {
            let session = format!("client-{}", i);
            orchestrator.invoke("q", Some(&session)).await.unwrap();
        }
        assert_eq!(orchestrator.memory().session_count().await, 16);
    }
}
