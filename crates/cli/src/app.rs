//! Service wiring shared by the HTTP server and the console commands.

use fiscal_assistant::agent::{
    FiscalSearchTool, Orchestrator, ReactAgent, ReactSettings, SessionMemory, Tool,
};
use fiscal_assistant::{
    AnswerOrigin, ElasticsearchIndex, FinalAnswer, FiscalPipeline, HealthError, Query, SearchIndex,
};
use fiscal_core::{AppConfig, AppResult};
use fiscal_llm::create_client;
use fiscal_prompt::load_prompt_or_builtin;
use std::sync::Arc;

/// The pipeline plus, when an LLM provider is configured, the agent.
pub struct FiscalApp {
    pipeline: Arc<FiscalPipeline>,
    orchestrator: Option<Orchestrator>,
}

impl FiscalApp {
    pub fn new(pipeline: Arc<FiscalPipeline>, orchestrator: Option<Orchestrator>) -> Self {
        Self {
            pipeline,
            orchestrator,
        }
    }

    /// Connect to the index and build the agent from configuration.
    ///
    /// Neither an unreachable index nor a missing LLM key is fatal: the
    /// former degrades retrieval to the fallback answer, the latter leaves
    /// the pipeline answering on its own.
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        let index = ElasticsearchIndex::connect(&config.search)
            .await
            .map(|index| Arc::new(index) as Arc<dyn SearchIndex>);
        let pipeline = Arc::new(FiscalPipeline::from_config(config, index));

        let orchestrator = match create_client(&config.llm) {
            Ok(llm) => {
                let prompt = load_prompt_or_builtin(config.agent.prompt_file.as_deref())?;
                let tools: Vec<Arc<dyn Tool>> =
                    vec![Arc::new(FiscalSearchTool::new(pipeline.clone()))];
                let settings = ReactSettings::from_config(
                    &config.llm,
                    &config.agent,
                    &config.domain.reference_link,
                );
                let agent = ReactAgent::new(llm, prompt, tools, settings);
                tracing::info!(
                    "Agent ready ({} / {})",
                    config.llm.provider,
                    config.llm.model
                );
                let memory =
                    SessionMemory::new(config.agent.max_history, config.agent.max_sessions);
                Some(Orchestrator::new(Arc::new(agent), memory))
            }
            Err(e) => {
                tracing::warn!("LLM unavailable ({}), answering from the knowledge base only", e);
                None
            }
        };

        Ok(Self::new(pipeline, orchestrator))
    }

    pub fn pipeline(&self) -> &FiscalPipeline {
        &self.pipeline
    }

    pub fn has_agent(&self) -> bool {
        self.orchestrator.is_some()
    }

    /// Answer a question the way the service boundary does.
    ///
    /// Greetings are answered locally. In strict mode refusals from the
    /// pipeline are returned as is and only in-domain questions reach the
    /// agent; otherwise every non-greeting question does.
    pub async fn respond(
        &self,
        question: &str,
        strict: bool,
        session: Option<&str>,
    ) -> AppResult<FinalAnswer> {
        let query = Query::new(question);

        match self.pipeline.screen(&query) {
            Some(answer) if answer.origin == AnswerOrigin::Greeting => return Ok(answer),
            Some(answer) if strict => {
                tracing::debug!(origin = ?answer.origin, "Refused before the agent");
                return Ok(answer);
            }
            _ => {}
        }

        match &self.orchestrator {
            Some(orchestrator) => {
                let text = orchestrator.invoke(question, session).await?;
                Ok(FinalAnswer::new(text, AnswerOrigin::AgentGenerated))
            }
            None => Ok(self.pipeline.answer(question).await),
        }
    }

    /// Pipeline answer, bypassing the agent.
    pub async fn respond_direct(&self, question: &str) -> FinalAnswer {
        self.pipeline.answer(question).await
    }

    pub async fn health(&self) -> Result<(), HealthError> {
        self.pipeline.health_check().await
    }

    /// Clear the result cache and, if given, a session's history.
    pub async fn reset(&self, session: Option<&str>) {
        self.pipeline.clear_cache();
        if let (Some(orchestrator), Some(session)) = (&self.orchestrator, session) {
            orchestrator.reset_session(session).await;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_greeting_never_reaches_agent() {
        let app = app_with(Some(Arc::new(EchoAgent)));
        let answer = app.respond("Bonjour", true, None).await.unwrap();
        assert_eq!(answer.origin, AnswerOrigin::Greeting);

        let answer = app.respond("Bonjour", false, None).await.unwrap();
        assert_eq!(answer.origin, AnswerOrigin::Greeting);
    }

    #[tokio::test]
    async fn test_strict_mode_gates_refusals() {
        let app = app_with(Some(Arc::new(EchoAgent)));

        let strict = app.respond("Quelle est la capitale du Mali ?", true, None).await.unwrap();
        assert_eq!(strict.origin, AnswerOrigin::OutOfDomainRefusal);

        let relaxed = app.respond("Quelle est la capitale du Mali ?", false, None).await.unwrap();
        assert_eq!(relaxed.origin, AnswerOrigin::AgentGenerated);
    }

    #[tokio::test]
    async fn test_in_domain_goes_to_agent_with_session() {
        let app = app_with(Some(Arc::new(EchoAgent)));

        app.respond("Comment payer la patente ?", true, Some("s")).await.unwrap();
        let second = app.respond("Et la TVA ?", true, Some("s")).await.unwrap();
        assert_eq!(second.text, "agent[2]: Et la TVA ?");

        app.reset(Some("s")).await;
        let third = app.respond("Et la TVA ?", true, Some("s")).await.unwrap();
        assert_eq!(third.text, "agent[0]: Et la TVA ?");
    }

    #[tokio::test]
    async fn test_without_agent_pipeline_answers() {
        let app = app_with(None);
        assert!(!app.has_agent());
        let answer = app.respond("Comment payer la patente ?", true, None).await.unwrap();
        assert_eq!(answer.origin, AnswerOrigin::NoMatchFallback);
    }

    #[tokio::test]
    async fn test_agent_failure_propagates() {
        let app = app_with(Some(Arc::new(BrokenAgent)));
        assert!(app.respond("Comment payer la patente ?", true, None).await.is_err());
    }
}
