// src/core/api_client.rs
//! HTTP client for the matching backend - JSON for everything except resume uploads

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::types::{
    ApiErrorBody, DeleteResponse, Job, JobDetailResponse, JobListResponse, JobSummary,
    MatchRequest, MatchResult, NewJob, Resume, ResumeListResponse, ResumeSummary, ResumeUpload,
};
use crate::utils;

const PROCESS_RESUME_ENDPOINT: &str = "/api/process_resume";
const PROCESS_JOB_ENDPOINT: &str = "/api/process_job";
const MATCH_ENDPOINT: &str = "/api/match";
const RESUMES_ENDPOINT: &str = "/api/resumes";
const JOBS_ENDPOINT: &str = "/api/jobs";

/// Operations the UI needs from the matching backend.
///
/// Errors display as the message meant for the user: the backend's `error`
/// field, a per-operation fallback, or the transport/parse failure text.
#[async_trait]
pub trait MatchingApi: Send + Sync {
    async fn process_resume(&self, upload: &ResumeUpload) -> Result<Resume>;
    async fn process_job(&self, job: &NewJob) -> Result<Job>;
    async fn match_resume(&self, request: &MatchRequest) -> Result<MatchResult>;
    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>>;
    async fn list_jobs(&self) -> Result<Vec<JobSummary>>;
    /// `Ok(None)` when the backend answered without a `job` object.
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>>;
    async fn delete_job(&self, job_id: &str) -> Result<()>;
    async fn delete_resume(&self, resume_id: &str) -> Result<()>;
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create new API client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and decode the JSON body of a 2xx response.
    async fn send<R>(&self, request: RequestBuilder, fallback: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            error!("Request to matching backend failed: {}", e);
            anyhow::Error::from(e)
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<R>(&body).map_err(anyhow::Error::from)
        } else {
            error!("Matching backend error {}: {}", status, body);
            Err(error_from_body(&body, fallback))
        }
    }
}

/// Turn a non-2xx body into the error shown to the user.
pub fn error_from_body(body: &str, fallback: &str) -> anyhow::Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            error: Some(message),
        }) if !message.is_empty() => anyhow!(message),
        Ok(_) => anyhow!(fallback.to_string()),
        Err(e) => anyhow::Error::from(e),
    }
}

#[async_trait]
impl MatchingApi for ApiClient {
    async fn process_resume(&self, upload: &ResumeUpload) -> Result<Resume> {
        let url = self.url(PROCESS_RESUME_ENDPOINT);
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(utils::content_type_for(&upload.file_name))?;
        let form = Form::new().part("resume", part);

        info!("Uploading resume {} to {}", upload.file_name, url);
        self.send(self.client.post(&url).multipart(form), "Failed to process resume")
            .await
    }

    async fn process_job(&self, job: &NewJob) -> Result<Job> {
        let url = self.url(PROCESS_JOB_ENDPOINT);
        info!("Submitting job description '{}' to {}", job.title, url);
        self.send(
            self.client.post(&url).json(job),
            "Failed to process job description",
        )
        .await
    }

    async fn match_resume(&self, request: &MatchRequest) -> Result<MatchResult> {
        let url = self.url(MATCH_ENDPOINT);
        info!(
            "Requesting match of resume {} against job {}",
            request.resume_id, request.job_id
        );
        self.send(self.client.post(&url).json(request), "Failed to calculate match")
            .await
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeSummary>> {
        let url = self.url(RESUMES_ENDPOINT);
        debug!("Loading resumes from {}", url);
        let response: ResumeListResponse = self
            .send(self.client.get(&url), "Failed to load resumes")
            .await?;
        Ok(response.resumes.unwrap_or_default())
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        let url = self.url(JOBS_ENDPOINT);
        debug!("Loading jobs from {}", url);
        let response: JobListResponse = self
            .send(self.client.get(&url), "Failed to load jobs")
            .await?;
        Ok(response.jobs.unwrap_or_default())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        let url = format!("{}/{}", self.url(JOBS_ENDPOINT), job_id);
        debug!("Loading job details from {}", url);
        let response: JobDetailResponse = self
            .send(self.client.get(&url), "Failed to load job details")
            .await?;
        Ok(response.job)
    }

    async fn delete_job(&self, job_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.url(JOBS_ENDPOINT), job_id);
        info!("Deleting job {}", job_id);
        let _: DeleteResponse = self
            .send(self.client.delete(&url), "Failed to delete job")
            .await?;
        Ok(())
    }

    async fn delete_resume(&self, resume_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.url(RESUMES_ENDPOINT), resume_id);
        info!("Deleting resume {}", resume_id);
        let _: DeleteResponse = self
            .send(self.client.delete(&url), "Failed to delete resume")
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one HTTP request with `status` and `body`; yields the raw request.
    async fn serve_once(status: &str, body: &str) -> (ApiClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        (client, server)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let head = text[..head_end].to_ascii_lowercase();
        if head.contains("transfer-encoding: chunked") {
            return text.ends_with("0\r\n\r\n");
        }
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= head_end + 4 + length
    }

    #[tokio::test]
    async fn test_upload_error_body_becomes_message() {
        let (client, server) =
            serve_once("400 Bad Request", r#"{"error": "Resume too large"}"#).await;
        let upload = ResumeUpload::new("cv.txt", b"Rust, SQL".to_vec());

        let err = client.process_resume(&upload).await.unwrap_err();
        assert_eq!(err.to_string(), "Resume too large");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/process_resume HTTP/1.1"));
        assert!(request.contains(r#"name="resume""#));
        assert!(request.contains(r#"filename="cv.txt""#));
        assert!(request.contains("Rust, SQL"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_surfaces_parse_error() {
        let (client, server) = serve_once("502 Bad Gateway", "<html>Bad Gateway</html>").await;
        let job = NewJob {
            title: "Engineer".to_string(),
            description: "Write Rust".to_string(),
        };

        let err = client.process_job(&job).await.unwrap_err();
        assert_ne!(err.to_string(), "Failed to process job description");
        assert!(err.downcast_ref::<serde_json::Error>().is_some());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/process_job HTTP/1.1"));
        assert!(request.contains(r#""title":"Engineer""#));
        assert!(request.contains(r#""description":"Write Rust""#));
    }

    #[tokio::test]
    async fn test_error_without_message_uses_fallback() {
        let (client, server) = serve_once("404 Not Found", "{}").await;
        let request = MatchRequest {
            resume_id: "r1".to_string(),
            job_id: "j1".to_string(),
        };

        let err = client.match_resume(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to calculate match");

        let sent = server.await.unwrap();
        assert!(sent.contains(r#""resume_id":"r1""#));
        assert!(sent.contains(r#""job_id":"j1""#));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_object() {
        let (client, server) = serve_once("200 OK", "{}").await;
        client.delete_job("j1").await.unwrap();
        assert!(server.await.unwrap().starts_with("DELETE /api/jobs/j1 HTTP/1.1"));

        let (client, server) = serve_once("200 OK", r#"{"success": true}"#).await;
        client.delete_resume("r1").await.unwrap();
        assert!(server.await.unwrap().starts_with("DELETE /api/resumes/r1 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_list_and_detail_responses() {
        let (client, _server) =
            serve_once("200 OK", r#"{"jobs": [{"id": "j1", "title": "Dev"}]}"#).await;
        let jobs = client.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Dev");

        let (client, _server) = serve_once("200 OK", "{}").await;
        assert!(client.list_resumes().await.unwrap().is_empty());

        let (client, server) = serve_once("200 OK", r#"{"success": true}"#).await;
        assert_eq!(client.get_job("j9").await.unwrap(), None);
        assert!(server.await.unwrap().starts_with("GET /api/jobs/j9 HTTP/1.1"));
    }

    #[test]
    fn test_error_field_becomes_message() {
        let err = error_from_body(r#"{"error": "Resume too large"}"#, "Failed to process resume");
        assert_eq!(err.to_string(), "Resume too large");
    }

    #[test]
    fn test_missing_error_field_uses_fallback() {
        let err = error_from_body("{}", "Failed to load jobs");
        assert_eq!(err.to_string(), "Failed to load jobs");

        let err = error_from_body(r#"{"error": ""}"#, "Failed to load jobs");
        assert_eq!(err.to_string(), "Failed to load jobs");
    }

    #[test]
    fn test_unparsable_body_surfaces_parse_error() {
        let err = error_from_body("<html>Bad Gateway</html>", "Failed to calculate match");
        assert_ne!(err.to_string(), "Failed to calculate match");
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url(MATCH_ENDPOINT), "http://localhost:5000/api/match");
    }
}
