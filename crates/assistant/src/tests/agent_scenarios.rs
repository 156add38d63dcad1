use super::support::{pipeline_over, ScriptedLlm, StubIndex};
use crate::agent::{
    Agent, FiscalSearchTool, Orchestrator, ReactAgent, ReactSettings, SessionMemory, Tool,
};
use fiscal_core::config::EarlyStopping;
use std::sync::Arc;

fn react_agent(llm: Arc<ScriptedLlm>, index: Arc<StubIndex>) -> ReactAgent {
    let pipeline = Arc::new(pipeline_over(index));
    let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(FiscalSearchTool::new(pipeline))];
    ReactAgent::new(
        llm,
        fiscal_prompt::builtin_prompt().unwrap(),
        tools,
        ReactSettings {
            model: "llama3-70b-8192".to_string(),
            temperature: 0.2,
            max_tokens: 1500,
            max_iterations: 4,
            early_stopping: EarlyStopping::Generate,
            reference_link: "https://www.dgid.sn/procedures-fiscales/".to_string(),
        },
    )
}

const SEARCH_QUITUS: &str = r#"Thought: je consulte la base fiscale
Action:
```
{"action": "BaseFiscalePremium", "action_input": "Comment obtenir un quitus fiscal ?"}
```"#;

const ANSWER: &str = r#"```
{"action": "Final Answer", "action_input": "Contexte fiscal : le quitus se demande au centre des services fiscaux."}
```"#;

#[tokio::test]
async fn test_agent_consults_pipeline_tool() {
    let index = StubIndex::with_hits(&[(
        "Comment obtenir un quitus fiscal ?",
        "Le quitus fiscal se demande au centre des services fiscaux.",
        9.0,
    )]);
    let llm = ScriptedLlm::new(&[SEARCH_QUITUS, ANSWER]);
    let agent = react_agent(llm.clone(), index.clone());

    let output = agent.invoke("Comment obtenir un quitus fiscal ?", &[]).await.unwrap();
    assert!(output.starts_with("Contexte fiscal"));
    assert_eq!(index.searches(), 1);
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn test_orchestrator_keeps_sessions_apart() {
    let index = StubIndex::with_hits(&[("q", "r", 1.0)]);
    let llm = ScriptedLlm::new(&[ANSWER]);
    let orchestrator = Orchestrator::new(
        Arc::new(react_agent(llm, index)),
        SessionMemory::new(20, 100),
    );

    orchestrator.invoke("Quitus ?", Some("alice")).await.unwrap();
    orchestrator.invoke("Et la patente ?", Some("alice")).await.unwrap();
    orchestrator.invoke("TVA ?", Some("bob")).await.unwrap();

    assert_eq!(orchestrator.memory().history("alice").await.len(), 4);
    assert_eq!(orchestrator.memory().history("bob").await.len(), 2);
}
