// src/types/mod.rs
//! Wire and view-model types shared by the API client and the UI layer

pub mod models;
pub mod response;

pub use models::{
    Job, JobSummary, MatchRequest, MatchResult, NewJob, Notification, Resume, ResumeSummary,
    ResumeUpload, Severity,
};
pub use response::{ApiErrorBody, DeleteResponse, JobDetailResponse, JobListResponse, ResumeListResponse};
