// src/ui/render.rs
//! Pure render functions: view models in, markup and detached elements out.
//!
//! Nothing here touches the document, so every view can be checked without a
//! page. Functions returning `Option` yield `None` when the data is not
//! renderable; callers turn that into an "invalid data" notification.

use crate::types::{Job, JobSummary, MatchResult, Notification, Resume, ResumeSummary};
use crate::ui::dom::{Element, SelectOption, ALERT_CREATED_AT};
use crate::ui::page;
use crate::utils::escape_html;

pub const NO_SKILLS_FOUND: &str = "No skills found";
pub const NO_MATCHING_SKILLS: &str = "No matching skills found";
pub const NO_MISSING_SKILLS: &str = "No missing skills";
pub const NO_JOBS_MESSAGE: &str = "No job descriptions found. Add one from the Upload section.";
pub const JOBS_TABLE_COLUMNS: usize = 3;

/// Color band of the match indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Green,
    Teal,
    Yellow,
    Red,
}

impl ScoreBand {
    /// Band for a score expressed in percent.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            ScoreBand::Green
        } else if percent >= 60.0 {
            ScoreBand::Teal
        } else if percent >= 40.0 {
            ScoreBand::Yellow
        } else {
            ScoreBand::Red
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Green => "#28a745",
            ScoreBand::Teal => "#17a2b8",
            ScoreBand::Yellow => "#ffc107",
            ScoreBand::Red => "#dc3545",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchView {
    pub percentage: String,
    pub band: ScoreBand,
    pub gradient: String,
    pub matching_html: String,
    pub missing_html: String,
    pub breakdown_html: Option<String>,
}

// ===== Skill chips =====

fn chip(skill: &str, extra_class: Option<&str>) -> String {
    match extra_class {
        Some(class) => format!(
            r#"<span class="skill-tag {}">{}</span>"#,
            class,
            escape_html(skill)
        ),
        None => format!(r#"<span class="skill-tag">{}</span>"#, escape_html(skill)),
    }
}

/// Chips for `skills`, or a muted placeholder when there are none.
pub fn skill_chips(skills: Option<&[String]>, extra_class: Option<&str>, placeholder: &str) -> String {
    match skills {
        Some(skills) if !skills.is_empty() => skills
            .iter()
            .map(|skill| chip(skill, extra_class))
            .collect::<Vec<_>>()
            .concat(),
        _ => format!(r#"<p class="text-muted">{}</p>"#, escape_html(placeholder)),
    }
}

// ===== Resume / job results =====

pub fn resume_result(resume: &Resume) -> Option<String> {
    let id = resume.id()?;
    let name = resume.name()?;
    let file_type = resume
        .file_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Unknown");
    let skills = skill_chips(resume.skills.as_deref(), None, NO_SKILLS_FOUND);

    Some(format!(
        r#"<div class="alert alert-success mb-4">Resume processed successfully!</div>
<div class="row">
  <div class="col-md-6">
    <div class="card h-100">
      <div class="card-header bg-primary text-white"><h5 class="mb-0">Resume Details</h5></div>
      <div class="card-body">
        <h5>{name}</h5>
        <p><strong>ID:</strong> {id}</p>
        <p><strong>File Type:</strong> {file_type}</p>
      </div>
    </div>
  </div>
  <div class="col-md-6">
    <div class="card h-100">
      <div class="card-header bg-primary text-white"><h5 class="mb-0">Extracted Skills</h5></div>
      <div class="card-body"><div class="skill-tags">{skills}</div></div>
    </div>
  </div>
</div>"#,
        name = escape_html(name),
        id = escape_html(id),
        file_type = escape_html(file_type),
        skills = skills,
    ))
}

/// Success message for a saved job description.
pub fn job_saved_message(job: &Job) -> Option<String> {
    let id = job.id()?;
    let title = job.title()?;
    Some(format!(
        r#"Job "{}" processed and saved successfully with ID: {}"#,
        title, id
    ))
}

// ===== Match result =====

pub fn match_view(result: &MatchResult) -> Option<MatchView> {
    let score = result.score()? * 100.0;
    let band = ScoreBand::from_percent(score);

    let breakdown_html = match (result.text_similarity, result.skill_match_score) {
        (None, None) => None,
        (text, skills) => {
            let line = |label: &str, value: Option<f64>| {
                value.map(|v| {
                    format!(
                        r#"<p><strong>{}:</strong> {}%</p>"#,
                        label,
                        (v * 100.0).round()
                    )
                })
            };
            Some(
                [line("Text similarity", text), line("Skill match", skills)]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .concat(),
            )
        }
    };

    Some(MatchView {
        percentage: format!("{}%", score.round()),
        band,
        gradient: format!(
            "conic-gradient({color} 0% {score:.2}%, #f3f3f3 {score:.2}% 100%)",
            color = band.color(),
            score = score
        ),
        matching_html: skill_chips(
            result.matching_skills.as_deref(),
            Some("matching-skill"),
            NO_MATCHING_SKILLS,
        ),
        missing_html: skill_chips(
            result.missing_skills.as_deref(),
            Some("missing-skill"),
            NO_MISSING_SKILLS,
        ),
        breakdown_html,
    })
}

// ===== Lists =====

pub fn resume_options(resumes: &[ResumeSummary]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", page::RESUME_SENTINEL))
        .chain(
            resumes
                .iter()
                .map(|r| SelectOption::new(r.id.clone(), r.name.clone())),
        )
        .collect()
}

pub fn job_options(jobs: &[JobSummary]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", page::JOB_SENTINEL))
        .chain(
            jobs.iter()
                .map(|j| SelectOption::new(j.id.clone(), j.title.clone())),
        )
        .collect()
}

/// Rows of the jobs table. Action buttons carry `data-id`; clicks are
/// resolved by delegation on the table body.
pub fn job_rows(jobs: &[JobSummary]) -> String {
    if jobs.is_empty() {
        return format!(
            r#"<tr><td colspan="{}" class="text-center">{}</td></tr>"#,
            JOBS_TABLE_COLUMNS, NO_JOBS_MESSAGE
        );
    }

    jobs.iter()
        .map(|job| {
            let id = escape_html(&job.id);
            format!(
                r#"<tr><td>{title}</td><td>{id}</td><td><button class="btn btn-sm btn-info view-job" data-id="{id}" aria-label="View job details"><i class="fas fa-eye"></i></button><button class="btn btn-sm btn-danger delete-job" data-id="{id}" aria-label="Delete job"><i class="fas fa-trash"></i></button></td></tr>"#,
                title = escape_html(&job.title),
                id = id,
            )
        })
        .collect::<Vec<_>>()
        .concat()
}

// ===== Page chrome =====

pub fn alert_element(notification: &Notification) -> Element {
    Element::new(notification.id.clone(), "div")
        .with_classes(&format!(
            "alert alert-{} alert-dismissible fade show",
            notification.severity
        ))
        .with_attribute("role", "alert")
        .with_attribute(ALERT_CREATED_AT, notification.created_at.to_rfc3339())
        .with_text(notification.message.clone())
        .with_html(format!(
            r#"{}<button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button>"#,
            escape_html(&notification.message)
        ))
}

pub fn loading_overlay() -> Element {
    Element::new(page::LOADING_INDICATOR, "div")
        .with_classes(
            "position-fixed top-0 start-0 w-100 h-100 d-flex justify-content-center align-items-center",
        )
        .with_style("background-color", "rgba(0, 0, 0, 0.5)")
        .with_style("z-index", "9999")
        .with_style("display", "flex")
        .with_child(
            Element::new("loading-spinner", "div")
                .with_classes("spinner-border text-primary mb-3")
                .with_attribute("role", "status"),
        )
        .with_child(Element::new(page::LOADING_MESSAGE, "div").with_classes("text-dark"))
}

pub fn job_modal() -> Element {
    Element::new(page::JOB_MODAL, "div")
        .with_classes("modal fade")
        .with_attribute("tabindex", "-1")
        .with_attribute("aria-labelledby", "job-modal-title")
        .with_attribute("aria-hidden", "true")
        .hidden()
        .with_child(Element::new("job-modal-title", "h5").with_text("Job Details"))
        .with_child(Element::new(page::MODAL_JOB_TITLE, "h3"))
        .with_child(
            Element::new(page::MODAL_JOB_DESCRIPTION, "div")
                .with_classes("border p-3 rounded bg-light"),
        )
        .with_child(Element::new(page::MODAL_JOB_SKILLS, "div").with_classes("skill-tags"))
}
