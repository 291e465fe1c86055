//! Screening pipeline: model prompts plus the timeline analysis merged into
//! one response. The timeline pass cannot fail; a resume without parseable
//! dates simply gets an empty `dateAnalysis`.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{generate_json, GenerativeModel, LlmError};
use crate::screening::models::{
    AnalyzeResumeResponse, DeepDiveReport, DeepDiveResponse, InterviewKit,
};
use crate::screening::prompts::{
    fill_template, DEEP_DIVE_PROMPT_TEMPLATE, INITIAL_ANALYSIS_PROMPT_TEMPLATE,
};
use crate::timeline::{TimelineAnalyzer, TimelineReport};

/// Generates the interview kit for `resume_text` against `job_description`.
pub async fn analyze_resume(
    llm: &dyn GenerativeModel,
    timeline: &TimelineAnalyzer,
    resume_text: String,
    job_description: &str,
) -> Result<AnalyzeResumeResponse, AppError> {
    let prompt = fill_template(
        INITIAL_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_text", resume_text.as_str()),
        ],
    );

    let kit: InterviewKit = generate_json(llm, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| model_error(e, "Gemini's response"))?;

    let date_analysis = timeline_report(timeline, &resume_text);
    info!(
        candidate = kit.candidate_name(),
        categories = ?kit.categories(),
        "interview kit generated"
    );

    Ok(AnalyzeResumeResponse::new(kit, resume_text, date_analysis))
}

/// Runs the project / inconsistency deep dive over previously extracted text.
pub async fn deep_dive(
    llm: &dyn GenerativeModel,
    timeline: &TimelineAnalyzer,
    resume_text: &str,
) -> Result<DeepDiveResponse, AppError> {
    let prompt = fill_template(DEEP_DIVE_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);

    let report: DeepDiveReport = generate_json(llm, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| model_error(e, "deep dive response from Gemini"))?;

    info!(projects = report.project_count(), "deep dive generated");

    Ok(DeepDiveResponse::new(report, timeline_report(timeline, resume_text)))
}

fn timeline_report(timeline: &TimelineAnalyzer, resume_text: &str) -> TimelineReport {
    let analysis = timeline.analyze_text(resume_text);
    if analysis.diagnostics.discarded > 0 {
        info!(
            discarded = analysis.diagnostics.discarded,
            "skipped unparseable date ranges"
        );
    }
    if !analysis.report.is_empty() {
        info!(
            overlaps = analysis.report.overlaps.len(),
            gaps = analysis.report.gaps.len(),
            "timeline findings"
        );
    }
    analysis.report
}

fn model_error(err: LlmError, what: &str) -> AppError {
    match err {
        LlmError::Parse(_) | LlmError::EmptyContent => {
            tracing::warn!("Unusable model output: {err}");
            AppError::ModelOutput(format!("Failed to parse {what} as JSON."))
        }
        other => AppError::Llm(other.to_string()),
    }
}
