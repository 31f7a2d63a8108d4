// Résumé ingestion: PDF text → structured fields → analysis → one stored row.
// All model calls go through llm_client::ModelClient.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod sanitize;
pub mod stages;
pub mod store;
