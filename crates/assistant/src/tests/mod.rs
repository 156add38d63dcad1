//! End-to-end scenarios over the pipeline and the agent, with in-memory
//! stand-ins for the search index and the LLM provider.

mod agent_scenarios;
mod pipeline_scenarios;
mod support;
