// src/ui/controller.rs
//! Form submission, list loading and job table actions.
//!
//! Each handler follows the same shape: validate locally, begin loading,
//! issue one request, end loading, then render or notify. Failures always end
//! in a notification and a cleared overlay; nothing is retried.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::MatchingApi;
use crate::types::{Job, MatchRequest, MatchResult, NewJob, Resume, Severity};
use crate::ui::dom::{DocumentHandle, Position};
use crate::ui::loading::LoadingController;
use crate::ui::navigation::Navigation;
use crate::ui::notify::Notifier;
use crate::ui::UiTimings;
use crate::ui::{page, render};
use crate::utils;

pub const VIEW_JOB_CLASS: &str = "view-job";
pub const DELETE_JOB_CLASS: &str = "delete-job";

/// Clicked control inside the jobs table, as seen by the delegated handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickTarget {
    pub classes: Vec<String>,
    pub data_id: Option<String>,
}

impl ClickTarget {
    pub fn new(classes: &str, data_id: Option<&str>) -> Self {
        Self {
            classes: classes.split_whitespace().map(str::to_string).collect(),
            data_id: data_id.map(str::to_string),
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Page finished loading.
    Ready,
    Navigate(String),
    /// Submission of the form with the given element id.
    Submit(String),
    JobsTableClick(ClickTarget),
}

#[derive(Clone)]
pub struct UiController {
    document: DocumentHandle,
    api: Arc<dyn MatchingApi>,
    notifier: Notifier,
    loading: LoadingController,
    navigation: Navigation,
    match_sequence: Arc<AtomicU64>,
}

impl UiController {
    pub fn new(document: DocumentHandle, api: Arc<dyn MatchingApi>, timings: UiTimings) -> Self {
        let notifier = Notifier::new(document.clone(), timings.alert_dismiss);
        let loading = LoadingController::new(document.clone(), notifier.clone(), timings.loading_timeout);

        Self {
            document,
            api,
            notifier,
            loading,
            navigation: Navigation::default(),
            match_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn dispatch(&self, event: UiEvent) {
        match event {
            UiEvent::Ready => self.init().await,
            UiEvent::Navigate(trigger) => {
                self.navigate(&trigger).await;
            }
            UiEvent::Submit(form) => match form.as_str() {
                page::RESUME_FORM => self.submit_resume().await,
                page::JOB_FORM => self.submit_job().await,
                page::MATCH_FORM => self.submit_match().await,
                other => debug!("No submit handler for form {}", other),
            },
            UiEvent::JobsTableClick(target) => self.on_jobs_table_click(&target).await,
        }
    }

    /// Initial list loads, run once the page is ready.
    pub async fn init(&self) {
        info!("Page ready, loading resumes and jobs");
        self.load_resumes().await;
        self.load_jobs().await;
    }

    pub async fn navigate(&self, trigger: &str) -> bool {
        let mut doc = self.document.lock().await;
        self.navigation.activate(&mut *doc, trigger)
    }

    async fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity).await;
    }

    // ===== Form submissions =====

    pub async fn submit_resume(&self) {
        info!("Resume upload form submitted");

        let upload = self.document.lock().await.selected_file(page::RESUME_FILE);
        let Some(upload) = upload else {
            self.notify("Please select a resume file to upload", Severity::Danger)
                .await;
            return;
        };
        if let Err(e) = utils::validate_resume_upload(&upload.file_name, upload.bytes.len()) {
            self.notify(&e.to_string(), Severity::Danger).await;
            return;
        }

        self.loading.begin("Processing resume...").await;

        match self.api.process_resume(&upload).await {
            Ok(resume) => {
                self.loading.end().await;
                self.display_resume_results(&resume).await;
                self.load_resumes().await;
            }
            Err(e) => {
                self.loading.end().await;
                error!("Error processing resume: {}", e);
                self.notify(&format!("Error processing resume: {}", e), Severity::Danger)
                    .await;
            }
        }
    }

    pub async fn submit_job(&self) {
        info!("Job description form submitted");

        let (title, description) = {
            let doc = self.document.lock().await;
            (doc.value(page::JOB_TITLE), doc.value(page::JOB_DESCRIPTION))
        };
        let (Some(title), Some(description)) = (title, description) else {
            self.notify("Form elements not found", Severity::Danger).await;
            return;
        };

        let title = title.trim();
        let description = description.trim();
        if title.is_empty() {
            self.notify("Please enter a job title", Severity::Danger).await;
            return;
        }
        if description.is_empty() {
            self.notify("Please enter a job description", Severity::Danger)
                .await;
            return;
        }

        self.loading.begin("Processing job description...").await;

        let new_job = NewJob {
            title: title.to_string(),
            description: description.to_string(),
        };
        match self.api.process_job(&new_job).await {
            Ok(job) => {
                self.loading.end().await;
                self.display_job_results(&job).await;
                self.document.lock().await.reset_form(page::JOB_FORM);
                self.load_jobs().await;
            }
            Err(e) => {
                self.loading.end().await;
                error!("Error processing job description: {}", e);
                self.notify(
                    &format!("Error processing job description: {}", e),
                    Severity::Danger,
                )
                .await;
            }
        }
    }

    pub async fn submit_match(&self) {
        info!("Match form submitted");

        let (resume_id, job_id) = {
            let doc = self.document.lock().await;
            (doc.value(page::SELECT_RESUME), doc.value(page::SELECT_JOB))
        };
        let (Some(resume_id), Some(job_id)) = (resume_id, job_id) else {
            self.notify("Form elements not found", Severity::Danger).await;
            return;
        };
        if resume_id.is_empty() {
            self.notify("Please select a resume", Severity::Danger).await;
            return;
        }
        if job_id.is_empty() {
            self.notify("Please select a job description", Severity::Danger)
                .await;
            return;
        }

        let sequence = self.match_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.begin("Calculating match...").await;

        let request = MatchRequest { resume_id, job_id };
        let outcome = self.api.match_resume(&request).await;

        if self.match_sequence.load(Ordering::SeqCst) != sequence {
            debug!("Discarding match response #{}, a newer match is pending", sequence);
            return;
        }

        match outcome {
            Ok(result) => {
                self.loading.end().await;
                self.display_match_results(&result).await;
            }
            Err(e) => {
                self.loading.end().await;
                error!("Error calculating match: {}", e);
                self.notify(&format!("Error calculating match: {}", e), Severity::Danger)
                    .await;
            }
        }
    }

    // ===== List loaders =====

    async fn is_initial_load(&self, select: &str) -> bool {
        let doc = self.document.lock().await;
        doc.options(select).map(|o| o.len()).unwrap_or(0) <= 1
    }

    pub async fn load_resumes(&self) {
        debug!("Loading resumes...");
        let initial_load = self.is_initial_load(page::SELECT_RESUME).await;
        if initial_load {
            self.loading.begin("Loading resumes...").await;
        }

        let outcome = self.api.list_resumes().await;
        if initial_load {
            self.loading.end().await;
        }

        match outcome {
            Ok(resumes) => {
                debug!("Resumes loaded: {}", resumes.len());
                self.document
                    .lock()
                    .await
                    .set_options(page::SELECT_RESUME, render::resume_options(&resumes));
            }
            Err(e) => {
                error!("Error loading resumes: {}", e);
                self.notify(&format!("Error loading resumes: {}", e), Severity::Danger)
                    .await;
            }
        }
    }

    pub async fn load_jobs(&self) {
        debug!("Loading jobs...");
        let initial_load = self.is_initial_load(page::SELECT_JOB).await;
        if initial_load {
            self.loading.begin("Loading jobs...").await;
        }

        let outcome = self.api.list_jobs().await;
        if initial_load {
            self.loading.end().await;
        }

        match outcome {
            Ok(jobs) => {
                debug!("Jobs loaded: {}", jobs.len());
                let mut doc = self.document.lock().await;
                doc.set_options(page::SELECT_JOB, render::job_options(&jobs));
                doc.set_inner_html(page::JOBS_TABLE_BODY, &render::job_rows(&jobs));
            }
            Err(e) => {
                error!("Error loading jobs: {}", e);
                self.notify(&format!("Error loading jobs: {}", e), Severity::Danger)
                    .await;
            }
        }
    }

    // ===== Job table actions =====

    /// Delegated click handler of the jobs table body.
    pub async fn on_jobs_table_click(&self, target: &ClickTarget) {
        if target.has_class(VIEW_JOB_CLASS) {
            self.view_job(target.data_id.as_deref()).await;
        } else if target.has_class(DELETE_JOB_CLASS) {
            self.delete_job(target.data_id.as_deref()).await;
        }
    }

    pub async fn view_job(&self, job_id: Option<&str>) {
        let Some(job_id) = job_id.filter(|id| !id.is_empty()) else {
            self.notify("Job ID not found", Severity::Danger).await;
            return;
        };

        self.loading.begin("Loading job details...").await;
        let outcome = self.api.get_job(job_id).await;
        self.loading.end().await;

        match outcome {
            Ok(Some(job)) => self.show_job_modal(&job).await,
            Ok(None) => {
                self.notify(
                    "Error loading job details: Invalid job data returned",
                    Severity::Danger,
                )
                .await;
            }
            Err(e) => {
                error!("Error loading job details: {}", e);
                self.notify(&format!("Error loading job details: {}", e), Severity::Danger)
                    .await;
            }
        }
    }

    pub async fn delete_job(&self, job_id: Option<&str>) {
        let confirmed = self
            .document
            .lock()
            .await
            .confirm("Are you sure you want to delete this job description?");
        if !confirmed {
            return;
        }
        let Some(job_id) = job_id.filter(|id| !id.is_empty()) else {
            self.notify("Job ID not found", Severity::Danger).await;
            return;
        };

        self.loading.begin("Deleting job...").await;
        match self.api.delete_job(job_id).await {
            Ok(()) => {
                self.loading.end().await;
                self.notify("Job description deleted successfully", Severity::Success)
                    .await;
                self.load_jobs().await;
            }
            Err(e) => {
                self.loading.end().await;
                error!("Error deleting job: {}", e);
                self.notify(
                    &format!("Error deleting job description: {}", e),
                    Severity::Danger,
                )
                .await;
            }
        }
    }

    pub async fn delete_resume(&self, resume_id: &str) {
        let confirmed = self
            .document
            .lock()
            .await
            .confirm("Are you sure you want to delete this resume?");
        if !confirmed {
            return;
        }
        if resume_id.is_empty() {
            self.notify("Resume ID not found", Severity::Danger).await;
            return;
        }

        self.loading.begin("Deleting resume...").await;
        match self.api.delete_resume(resume_id).await {
            Ok(()) => {
                self.loading.end().await;
                self.notify("Resume deleted successfully", Severity::Success)
                    .await;
                self.load_resumes().await;
            }
            Err(e) => {
                self.loading.end().await;
                error!("Error deleting resume: {}", e);
                self.notify(&format!("Error deleting resume: {}", e), Severity::Danger)
                    .await;
            }
        }
    }

    // ===== Result renderers =====

    async fn display_resume_results(&self, resume: &Resume) {
        let Some(html) = render::resume_result(resume) else {
            self.notify("Invalid resume data", Severity::Danger).await;
            return;
        };

        let mut doc = self.document.lock().await;
        if !doc.contains(page::PROCESSING_RESULTS) || !doc.contains(page::RESULT_CONTENT) {
            error!("Result elements not found");
            return;
        }
        doc.set_inner_html(page::RESULT_CONTENT, &html);
        doc.set_visible(page::PROCESSING_RESULTS, true);
    }

    async fn display_job_results(&self, job: &Job) {
        match render::job_saved_message(job) {
            Some(message) => self.notify(&message, Severity::Success).await,
            None => {
                self.notify("Invalid job data received", Severity::Danger)
                    .await
            }
        }
    }

    async fn display_match_results(&self, result: &MatchResult) {
        let Some(view) = render::match_view(result) else {
            self.notify("Invalid match data received", Severity::Danger)
                .await;
            return;
        };

        let mut doc = self.document.lock().await;
        let required = [
            page::MATCH_RESULTS,
            page::MATCH_PERCENTAGE,
            page::MATCHING_SKILLS,
            page::MISSING_SKILLS,
        ];
        if required.iter().any(|id| !doc.contains(id)) {
            error!("Match result elements not found");
            return;
        }

        doc.set_text(page::MATCH_PERCENTAGE, &view.percentage);
        if let Some(circle) = doc.first_with_class(page::PROGRESS_CIRCLE_CLASS) {
            doc.set_style(&circle, "background", &view.gradient);
        }
        doc.set_inner_html(page::MATCHING_SKILLS, &view.matching_html);
        doc.set_inner_html(page::MISSING_SKILLS, &view.missing_html);
        if let Some(breakdown) = &view.breakdown_html {
            doc.set_inner_html(page::MATCH_BREAKDOWN, breakdown);
        }
        doc.set_visible(page::MATCH_RESULTS, true);
    }

    async fn show_job_modal(&self, job: &Job) {
        let (Some(title), Some(description)) = (job.title(), job.description()) else {
            self.notify("Invalid job data", Severity::Danger).await;
            return;
        };

        let shown = {
            let mut doc = self.document.lock().await;
            if !doc.contains(page::JOB_MODAL) {
                doc.insert_element(page::BODY, render::job_modal(), Position::Last);
            }
            doc.set_text(page::MODAL_JOB_TITLE, title);
            doc.set_text(page::MODAL_JOB_DESCRIPTION, description);
            let skills = job
                .skills
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|skill| format!(r#"<span class="skill-tag">{}</span>"#, utils::escape_html(skill)))
                .collect::<Vec<_>>()
                .concat();
            doc.set_inner_html(page::MODAL_JOB_SKILLS, &skills);
            doc.show_modal(page::JOB_MODAL)
        };

        if let Err(e) = shown {
            warn!("Error showing modal: {}", e);
            self.notify("Error displaying job details", Severity::Danger)
                .await;
        }
    }
}
