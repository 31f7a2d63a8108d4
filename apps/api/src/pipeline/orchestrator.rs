//! Résumé pipeline: sequences extraction, analysis and persistence for one upload.
//!
//! Flow: extract_structured → analyze → append_record.
//!
//! Extraction failure ends the run with nothing written. Analysis failure is downgraded
//! to an `{error, raw}` placeholder and the row is still stored. The only write is the
//! final single-row INSERT, so an aborted run never leaves a partial row behind.

use chrono::Utc;
use tracing::{error, info, warn};

use crate::llm_client::ModelClient;
use crate::models::resume::{AnalysisOutcome, ErrorPlaceholder, NewResume, StructuredRecord};
use crate::pipeline::stages::{analyze, extract_structured, StageError};
use crate::pipeline::store::{ResumeStore, StoreError};

const NO_EXTRACTION_OUTPUT: &str = "No raw output available";
const NO_ANALYSIS_OUTPUT: &str = "No raw output";

/// Result of a pipeline run that did not hit a storage failure.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Both stages ran (analysis possibly as a placeholder) and the row was stored.
    Completed {
        id: i32,
        extracted_data: StructuredRecord,
        llm_analysis: AnalysisOutcome,
    },
    /// Extraction failed; analysis was skipped and nothing was stored.
    ExtractionFailed(ErrorPlaceholder),
}

/// Runs one pipeline invocation for an already-extracted document.
///
/// Returns `Err` only when the final write fails; the in-memory results are dropped then.
pub async fn process_resume(
    model: &dyn ModelClient,
    store: &dyn ResumeStore,
    filename: &str,
    document_text: String,
) -> Result<PipelineOutcome, StoreError> {
    info!(filename, chars = document_text.len(), "Extracting structured fields");
    let extracted = match extract_structured(model, &document_text).await {
        Ok(record) => record,
        Err(e) => {
            warn!(filename, "Extraction stage failed: {e}");
            return Ok(PipelineOutcome::ExtractionFailed(placeholder(
                format!("LLM extraction failed: {e}"),
                &e,
                NO_EXTRACTION_OUTPUT,
            )));
        }
    };
    drop(document_text);

    info!(filename, skills = extracted.skill_count(), "Analyzing extracted record");
    let llm_analysis = match analyze(model, &extracted).await {
        Ok(analysis) => {
            info!(filename, rating = ?analysis.resume_rating(), "Analysis complete");
            AnalysisOutcome::Analyzed(analysis)
        }
        Err(e) => {
            warn!(filename, "Analysis stage failed, storing placeholder: {e}");
            AnalysisOutcome::Failed(placeholder(
                format!("LLM analysis failed: {}", e.detail()),
                &e,
                NO_ANALYSIS_OUTPUT,
            ))
        }
    };

    let record = NewResume {
        filename: filename.to_string(),
        uploaded_at: Utc::now(),
        name: extracted.name().map(String::from),
        email: extracted.email().map(String::from),
        phone: extracted.phone().map(String::from),
        extracted_data: extracted.to_value(),
        llm_analysis: llm_analysis.to_value(),
    };

    let id = store.append_record(record).await.map_err(|e| {
        error!(filename, "Persisting résumé failed: {e}");
        e
    })?;

    info!(filename, id, "Résumé stored");
    Ok(PipelineOutcome::Completed {
        id,
        extracted_data: extracted,
        llm_analysis,
    })
}

/// Extraction errors keep the "Invalid JSON." marker; analysis errors carry only the detail.
fn placeholder(error: String, e: &StageError, no_raw: &str) -> ErrorPlaceholder {
    ErrorPlaceholder {
        error,
        raw: e.raw().unwrap_or(no_raw).to_string(),
    }
}
