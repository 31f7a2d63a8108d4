//! Test doubles for the pipeline's collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{Config, ExtractionFailureMode};
use crate::extractor::{ExtractError, TextExtractor};
use crate::llm_client::{LlmError, ModelClient};
use crate::models::resume::{NewResume, ResumeDetail, ResumeSummary};
use crate::pipeline::store::{ResumeStore, StoreError};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

/// Replays canned responses in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    /// Every call sleeps for `delay` before answering.
    pub fn slow(responses: Vec<Result<String, LlmError>>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(responses)
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn invoke(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// In-memory `ResumeStore`; ids start at 1 like a SERIAL column.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<NewResume>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn failing(detail: &str) -> Self {
        Self {
            failure: Some(detail.to_string()),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> Vec<NewResume> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(detail) => Err(StoreError::Unavailable(detail.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn append_record(&self, record: NewResume) -> Result<i32, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        rows.push(record);
        Ok(rows.len() as i32)
    }

    async fn list_summaries(&self) -> Result<Vec<ResumeSummary>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let mut summaries: Vec<(i32, &NewResume)> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i as i32 + 1, row))
            .collect();
        summaries.sort_by(|a, b| b.1.uploaded_at.cmp(&a.1.uploaded_at).then(b.0.cmp(&a.0)));
        Ok(summaries
            .into_iter()
            .map(|(id, row)| ResumeSummary {
                id,
                filename: row.filename.clone(),
                name: row.name.clone(),
                email: row.email.clone(),
                phone: row.phone.clone(),
            })
            .collect())
    }

    async fn get_detail(&self, id: i32) -> Result<Option<ResumeDetail>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let index = usize::try_from(id - 1).ok();
        Ok(index.and_then(|i| rows.get(i)).map(|row| ResumeDetail {
            id,
            filename: row.filename.clone(),
            uploaded_at: row.uploaded_at,
            name: row.name.clone(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            extracted_data: row.extracted_data.clone(),
            llm_analysis: row.llm_analysis.clone(),
        }))
    }
}

/// Returns fixed text for any input, or fails when constructed with `unreadable`.
pub struct StubExtractor {
    text: Result<String, String>,
}

impl StubExtractor {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
        }
    }

    pub fn unreadable(detail: &str) -> Self {
        Self {
            text: Err(detail.to_string()),
        }
    }
}

impl TextExtractor for StubExtractor {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
        self.text
            .clone()
            .map_err(ExtractError::UnreadableDocument)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        anthropic_api_key: "test-key".to_string(),
        llm_model: "test-model".to_string(),
        llm_max_attempts: 1,
        port: 0,
        rust_log: "debug".to_string(),
        cors_allowed_origins: vec![],
        extraction_failure_mode: ExtractionFailureMode::SuccessPayload,
        pipeline_timeout: None,
        max_upload_bytes: 1024 * 1024,
    }
}

pub fn test_state(
    model: Arc<ScriptedModel>,
    store: Arc<MemoryStore>,
    extractor: StubExtractor,
    config: Config,
) -> AppState {
    AppState {
        llm: model,
        store,
        extractor: Arc::new(extractor),
        config,
    }
}
