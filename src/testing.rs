// src/testing.rs
//! In-process stand-in for the matching backend

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::core::MatchingApi;
use crate::ui::{page, DocumentHandle};
use crate::types::{
    Job, JobSummary, MatchRequest, MatchResult, NewJob, Resume, ResumeSummary, ResumeUpload,
};

#[derive(Default)]
pub struct FakeApi {
    pub resumes: Mutex<Vec<ResumeSummary>>,
    pub jobs: Mutex<Vec<JobSummary>>,
    pub list_error: Option<String>,
    pub resume_reply: Option<Result<Resume, String>>,
    pub job_reply: Option<Result<Job, String>>,
    pub job_detail: Option<Result<Option<Job>, String>>,
    pub delete_error: Option<String>,
    /// Consumed one per match request: delay before answering, then the reply.
    pub match_replies: Mutex<VecDeque<(Duration, Result<MatchResult, String>)>>,
    /// Page to inspect while a list request is in flight.
    pub page: Option<DocumentHandle>,
    /// Whether the loading overlay was on the page, one entry per list request.
    pub overlay_during_lists: Mutex<Vec<bool>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn queue_match(&self, delay: Duration, reply: Result<MatchResult, String>) {
        self.match_replies.lock().unwrap().push_back((delay, reply));
    }

    pub fn overlay_seen(&self) -> Vec<bool> {
        self.overlay_during_lists.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn observe_overlay(&self) {
        if let Some(doc) = &self.page {
            let shown = doc.lock().await.contains(page::LOADING_INDICATOR);
            self.overlay_during_lists.lock().unwrap().push(shown);
        }
    }

    fn reply<T: Clone>(reply: &Option<Result<T, String>>) -> Result<T> {
        match reply {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Err(anyhow!("no reply configured")),
        }
    }
}

#[async_trait]
impl MatchingApi for FakeApi {
    async fn process_resume(&self, upload: &ResumeUpload) -> Result<Resume> {
        self.record(format!("POST /api/process_resume {}", upload.file_name));
        let resume = Self::reply(&self.resume_reply)?;
        if let (Some(id), Some(name)) = (resume.id(), resume.name()) {
            self.resumes.lock().unwrap().push(ResumeSummary {
                id: id.to_string(),
                name: name.to_string(),
            });
        }
        Ok(resume)
    }

    async fn process_job(&self, job: &NewJob) -> Result<Job> {
        self.record(format!("POST /api/process_job {}", job.title));
        let saved = Self::reply(&self.job_reply)?;
        if let (Some(id), Some(title)) = (saved.id(), saved.title()) {
            self.jobs.lock().unwrap().push(JobSummary {
                id: id.to_string(),
                title: title.to_string(),
            });
        }
        Ok(saved)
    }

    async fn match_resume(&self, request: &MatchRequest) -> Result<MatchResult> {
        self.record(format!(
            "POST /api/match {} {}",
            request.resume_id, request.job_id
        ));
        let next = self.match_replies.lock().unwrap().pop_front();
        let (delay, reply) = next.ok_or_else(|| anyhow!("no reply configured"))?;
        tokio::time::sleep(delay).await;
        reply.map_err(|message| anyhow!(message))
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>> {
        self.record("GET /api/resumes".to_string());
        self.observe_overlay().await;
        if let Some(message) = &self.list_error {
            return Err(anyhow!(message.clone()));
        }
        Ok(self.resumes.lock().unwrap().clone())
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        self.record("GET /api/jobs".to_string());
        self.observe_overlay().await;
        if let Some(message) = &self.list_error {
            return Err(anyhow!(message.clone()));
        }
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        self.record(format!("GET /api/jobs/{}", job_id));
        Self::reply(&self.job_detail)
    }

    async fn delete_job(&self, job_id: &str) -> Result<()> {
        self.record(format!("DELETE /api/jobs/{}", job_id));
        if let Some(message) = &self.delete_error {
            return Err(anyhow!(message.clone()));
        }
        self.jobs.lock().unwrap().retain(|j| j.id != job_id);
        Ok(())
    }

    async fn delete_resume(&self, resume_id: &str) -> Result<()> {
        self.record(format!("DELETE /api/resumes/{}", resume_id));
        if let Some(message) = &self.delete_error {
            return Err(anyhow!(message.clone()));
        }
        self.resumes.lock().unwrap().retain(|r| r.id != resume_id);
        Ok(())
    }
}
