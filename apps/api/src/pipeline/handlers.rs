//! Axum route handlers for résumé upload and retrieval.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tokio::task::JoinError;
use tracing::info;

use crate::config::ExtractionFailureMode;
use crate::errors::AppError;
use crate::models::resume::{
    AnalysisOutcome, ErrorPlaceholder, ResumeDetail, ResumeSummary, StructuredRecord,
};
use crate::pipeline::orchestrator::{process_resume, PipelineOutcome};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
const PDF_CONTENT_TYPE: &str = "application/pdf";
const UPLOAD_MESSAGE: &str = "Resume uploaded and processed successfully";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub analysis: UploadAnalysis,
}

/// Either both pipeline results, or the extraction failure reported in-band.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadAnalysis {
    Processed {
        extracted_data: StructuredRecord,
        llm_analysis: AnalysisOutcome,
    },
    Failed(ErrorPlaceholder),
}

struct PdfUpload {
    filename: String,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/upload
///
/// Accepts a multipart `file` field holding a PDF, runs the extraction/analysis
/// pipeline and stores the result.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_pdf_field(multipart, state.config.max_upload_bytes).await?;
    info!(filename = %upload.filename, bytes = upload.bytes.len(), "Received upload");

    let extractor = Arc::clone(&state.extractor);
    let bytes = upload.bytes;
    let document_text = tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
        .await
        .map_err(extraction_join_error)?
        .map_err(|e| AppError::UnreadableDocument(e.to_string()))?;

    let run = process_resume(
        state.llm.as_ref(),
        state.store.as_ref(),
        &upload.filename,
        document_text,
    );
    let outcome = match state.config.pipeline_timeout {
        Some(deadline) => tokio::time::timeout(deadline, run)
            .await
            .map_err(|_| AppError::Timeout)??,
        None => run.await?,
    };

    let analysis = match outcome {
        PipelineOutcome::Completed {
            id,
            extracted_data,
            llm_analysis,
        } => {
            info!(id, filename = %upload.filename, "Upload processed");
            UploadAnalysis::Processed {
                extracted_data,
                llm_analysis,
            }
        }
        PipelineOutcome::ExtractionFailed(placeholder) => {
            match state.config.extraction_failure_mode {
                ExtractionFailureMode::SuccessPayload => UploadAnalysis::Failed(placeholder),
                ExtractionFailureMode::ErrorStatus => {
                    return Err(AppError::ExtractionFailed(placeholder.error))
                }
            }
        }
    };

    Ok(Json(UploadResponse {
        message: UPLOAD_MESSAGE,
        analysis,
    }))
}

/// GET /api/resumes
///
/// Summaries of every stored résumé, newest first.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(state.store.list_summaries().await?))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<i32>,
) -> Result<Json<ResumeDetail>, AppError> {
    let detail = state
        .store
        .get_detail(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    Ok(Json(detail))
}

/// Finds the upload field and rejects anything that is not declared as a PDF.
async fn read_pdf_field(mut multipart: Multipart, limit: usize) -> Result<PdfUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart body", limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::Validation(
                "Only PDF files are allowed.".to_string(),
            ));
        }
        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Could not read upload", limit))?;
        return Ok(PdfUpload { filename, bytes });
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Keeps the body-limit rejection distinct from malformed multipart input.
fn multipart_error(e: MultipartError, context: &str, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the limit of {limit} bytes"))
    } else {
        AppError::Validation(format!("{context}: {}", e.body_text()))
    }
}

/// A panic inside the PDF parser is reported as an unreadable document.
fn extraction_join_error(e: JoinError) -> AppError {
    if e.is_panic() {
        AppError::UnreadableDocument("the PDF parser could not process this file".to_string())
    } else {
        AppError::Internal(anyhow::anyhow!("text extraction task was cancelled: {e}"))
    }
}
