use serde::{Deserialize, Serialize};

use crate::types::models::{Job, JobSummary, ResumeSummary};

// ===== Backend Response Envelopes =====

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResumeListResponse {
    #[serde(default)]
    pub resumes: Option<Vec<ResumeSummary>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JobListResponse {
    #[serde(default)]
    pub jobs: Option<Vec<JobSummary>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JobDetailResponse {
    #[serde(default)]
    pub job: Option<Job>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: Option<bool>,
}

/// Body of every non-2xx backend response.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
