//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::extraction::PDF_CONTENT_TYPE;
use crate::screening::analyzer;
use crate::screening::models::{AnalyzeResumeResponse, DeepDiveRequest, DeepDiveResponse};
use crate::state::AppState;

/// Fields of the `/analyze-resume/` multipart form.
struct UploadForm {
    file: Bytes,
    job_description: String,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                if field.content_type() != Some(PDF_CONTENT_TYPE) {
                    return Err(AppError::Validation(
                        "Invalid file type. Please upload a PDF.".to_string(),
                    ));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                file = Some(bytes);
            }
            Some("job_description") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_description: {e}"))
                })?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description cannot be empty".to_string()))?;

    Ok(UploadForm {
        file,
        job_description,
    })
}

/// POST /analyze-resume/
///
/// Extracts the uploaded PDF, generates an interview kit against the job
/// description, and attaches the raw text plus the work-history timeline findings.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    info!(uid = %user.uid, email = ?user.email, "Analyze request received");

    let form = read_upload_form(multipart).await?;
    let resume_text = state.extractor.extract(form.file).await?;

    let response = analyzer::analyze_resume(
        state.llm.as_ref(),
        &state.timeline,
        resume_text,
        &form.job_description,
    )
    .await?;

    Ok(Json(response))
}

/// POST /deep-dive-analysis/
///
/// Project-level scrutiny of previously extracted resume text.
pub async fn handle_deep_dive(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<DeepDiveRequest>,
) -> Result<Json<DeepDiveResponse>, AppError> {
    info!(uid = %user.uid, email = ?user.email, "Deep dive request received");

    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let response =
        analyzer::deep_dive(state.llm.as_ref(), &state.timeline, &request.resume_text).await?;

    Ok(Json(response))
}
