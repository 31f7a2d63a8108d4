//! The two model-backed stages: structured extraction and qualitative analysis.
//!
//! Each stage makes exactly one model call, runs the sanitizer, then parses strictly.
//! Neither retries; a failed attempt fails the stage.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::ModelClient;
use crate::models::resume::{AnalysisRecord, StructuredRecord};
use crate::pipeline::prompts::{
    ANALYSIS_SYSTEM, ANALYSIS_USER_TEMPLATE, EXTRACTION_SYSTEM, EXTRACTION_USER_TEMPLATE,
};
use crate::pipeline::sanitize::sanitize;

#[derive(Debug, Error)]
pub enum StageError {
    /// Transport, auth, quota or empty-response failure from the model call itself.
    #[error("{0}")]
    ModelInvocationFailed(String),

    /// The model answered but no JSON object could be parsed from it.
    /// `raw` is the unsanitized answer; `None` when the answer was empty.
    #[error("Invalid JSON. {detail}")]
    InvalidJson { detail: String, raw: Option<String> },
}

impl StageError {
    pub fn raw(&self) -> Option<&str> {
        match self {
            StageError::ModelInvocationFailed(_) => None,
            StageError::InvalidJson { raw, .. } => raw.as_deref(),
        }
    }

    /// The underlying message without the "Invalid JSON." prefix.
    pub fn detail(&self) -> &str {
        match self {
            StageError::ModelInvocationFailed(message) => message,
            StageError::InvalidJson { detail, .. } => detail,
        }
    }
}

/// Asks the model to turn résumé text into a `StructuredRecord`.
pub async fn extract_structured(
    model: &dyn ModelClient,
    document_text: &str,
) -> Result<StructuredRecord, StageError> {
    let user = EXTRACTION_USER_TEMPLATE.replace("{resume_text}", document_text);
    invoke_for_object(model, EXTRACTION_SYSTEM, &user)
        .await
        .map(StructuredRecord)
}

/// Asks the model to review an already-extracted record.
pub async fn analyze(
    model: &dyn ModelClient,
    record: &StructuredRecord,
) -> Result<AnalysisRecord, StageError> {
    let user = ANALYSIS_USER_TEMPLATE.replace("{structured_json}", &record.to_value().to_string());
    invoke_for_object(model, ANALYSIS_SYSTEM, &user)
        .await
        .map(AnalysisRecord)
}

async fn invoke_for_object(
    model: &dyn ModelClient,
    system: &str,
    user: &str,
) -> Result<Map<String, Value>, StageError> {
    let raw = model
        .invoke(system, user)
        .await
        .map_err(|e| StageError::ModelInvocationFailed(e.to_string()))?;

    debug!(raw_len = raw.len(), "model response received");

    parse_object(&sanitize(&raw)).map_err(|detail| StageError::InvalidJson {
        detail,
        raw: Some(raw).filter(|r| !r.is_empty()),
    })
}

/// Strict parse of sanitizer output. The error is the parser's own message.
fn parse_object(candidate: &str) -> Result<Map<String, Value>, String> {
    if candidate.is_empty() {
        return Err("no JSON object found in model output".to_string());
    }
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, found {}", kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
