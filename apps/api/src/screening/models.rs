use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::timeline::TimelineReport;

const NOT_FOUND: &str = "Not Found";

/// Keys the service adds next to the model output. A model reply that uses
/// them itself loses those entries so the response never repeats a key.
const SERVICE_KEYS: [&str; 2] = ["rawResumeText", "dateAnalysis"];

fn without_service_keys(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.retain(|key, _| !SERVICE_KEYS.contains(&key.as_str()));
    fields
}

/// Interview material generated for one resume / job description pair.
///
/// Held as the model's own JSON object: unknown fields, value types and key
/// order (including the order of `categorizedQuestions`) reach the client
/// as generated. Only a non-object reply is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewKit(Map<String, Value>);

impl InterviewKit {
    /// `candidateName`, or "Not Found" when the model left it out.
    pub fn candidate_name(&self) -> &str {
        self.0
            .get("candidateName")
            .and_then(Value::as_str)
            .unwrap_or(NOT_FOUND)
    }

    /// Question categories in the order the model listed them.
    pub fn categories(&self) -> Vec<&str> {
        self.0
            .get("categorizedQuestions")
            .and_then(Value::as_object)
            .map(|c| c.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Deep-dive findings about the candidate's projects, passed through like
/// [`InterviewKit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeepDiveReport(Map<String, Value>);

impl DeepDiveReport {
    pub fn project_count(&self) -> usize {
        self.0
            .get("projectAnalyses")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// POST /analyze-resume/ response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeResponse {
    #[serde(flatten)]
    pub kit: InterviewKit,
    /// Echoed back so the client can request a deep dive without re-uploading.
    pub raw_resume_text: String,
    pub date_analysis: TimelineReport,
}

impl AnalyzeResumeResponse {
    pub fn new(kit: InterviewKit, raw_resume_text: String, date_analysis: TimelineReport) -> Self {
        Self {
            kit: InterviewKit(without_service_keys(kit.0)),
            raw_resume_text,
            date_analysis,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepDiveRequest {
    pub resume_text: String,
}

/// POST /deep-dive-analysis/ response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDiveResponse {
    #[serde(flatten)]
    pub report: DeepDiveReport,
    pub date_analysis: TimelineReport,
}

impl DeepDiveResponse {
    pub fn new(report: DeepDiveReport, date_analysis: TimelineReport) -> Self {
        Self {
            report: DeepDiveReport(without_service_keys(report.0)),
            date_analysis,
        }
    }
}
