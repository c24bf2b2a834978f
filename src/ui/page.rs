// src/ui/page.rs
//! Element ids of the resume-matcher page and its default layout

use crate::ui::dom::{Document, Element, MemoryDocument, Position, SelectOption};

pub const BODY: &str = "body";
pub const CONTAINER_CLASS: &str = "container";
pub const MAIN_CONTAINER: &str = "main-container";
pub const CONTENT_SECTION_CLASS: &str = "content-section";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const ACTIVE_CLASS: &str = "active";

pub const NAV_UPLOAD: &str = "nav-upload";
pub const NAV_MATCH: &str = "nav-match";
pub const NAV_JOBS: &str = "nav-jobs";
pub const NAV_ABOUT: &str = "nav-about";

pub const UPLOAD_SECTION: &str = "upload-section";
pub const MATCH_SECTION: &str = "match-section";
pub const JOBS_SECTION: &str = "jobs-section";
pub const ABOUT_SECTION: &str = "about-section";

pub const RESUME_FORM: &str = "resume-upload-form";
pub const RESUME_FILE: &str = "resume-file";
pub const PROCESSING_RESULTS: &str = "processing-results";
pub const RESULT_CONTENT: &str = "result-content";

pub const JOB_FORM: &str = "job-description-form";
pub const JOB_TITLE: &str = "job-title";
pub const JOB_DESCRIPTION: &str = "job-description";

pub const MATCH_FORM: &str = "match-form";
pub const SELECT_RESUME: &str = "select-resume";
pub const SELECT_JOB: &str = "select-job";
pub const MATCH_RESULTS: &str = "match-results";
pub const MATCH_PERCENTAGE: &str = "match-percentage";
pub const PROGRESS_CIRCLE_CLASS: &str = "progress-circle";
pub const MATCHING_SKILLS: &str = "matching-skills";
pub const MISSING_SKILLS: &str = "missing-skills";
pub const MATCH_BREAKDOWN: &str = "match-breakdown";

pub const JOBS_TABLE_BODY: &str = "jobs-table-body";

pub const LOADING_INDICATOR: &str = "loading-indicator";
pub const LOADING_MESSAGE: &str = "loading-message";

pub const JOB_MODAL: &str = "job-modal";
pub const MODAL_JOB_TITLE: &str = "modal-job-title";
pub const MODAL_JOB_DESCRIPTION: &str = "modal-job-description";
pub const MODAL_JOB_SKILLS: &str = "modal-job-skills";

pub const RESUME_SENTINEL: &str = "Select a resume...";
pub const JOB_SENTINEL: &str = "Select a job...";

fn nav_link(id: &str, label: &str, active: bool) -> Element {
    let classes = if active { "nav-link active" } else { "nav-link" };
    Element::new(id, "a")
        .with_classes(classes)
        .with_attribute("href", "#")
        .with_text(label)
}

fn section(id: &str, visible: bool) -> Element {
    let element = Element::new(id, "section").with_classes(CONTENT_SECTION_CLASS);
    if visible {
        element.with_style("display", "block")
    } else {
        element.hidden()
    }
}

/// Page layout served by the resume-matcher frontend: upload section visible,
/// everything else hidden until navigated to.
pub fn default_layout() -> MemoryDocument {
    let mut doc = MemoryDocument::new(BODY);

    let nav = Element::new("main-nav", "nav")
        .with_classes("navbar")
        .with_child(nav_link(NAV_UPLOAD, "Upload", true))
        .with_child(nav_link(NAV_MATCH, "Match", false))
        .with_child(nav_link(NAV_JOBS, "Jobs", false))
        .with_child(nav_link(NAV_ABOUT, "About", false));

    let upload = section(UPLOAD_SECTION, true)
        .with_child(
            Element::new(RESUME_FORM, "form")
                .with_child(Element::new(RESUME_FILE, "input").with_attribute("type", "file")),
        )
        .with_child(
            Element::new(PROCESSING_RESULTS, "div")
                .hidden()
                .with_child(Element::new(RESULT_CONTENT, "div")),
        )
        .with_child(
            Element::new(JOB_FORM, "form")
                .with_child(Element::new(JOB_TITLE, "input").with_attribute("type", "text"))
                .with_child(Element::new(JOB_DESCRIPTION, "textarea")),
        );

    let match_section = section(MATCH_SECTION, false)
        .with_child(
            Element::new(MATCH_FORM, "form")
                .with_child(Element::new(SELECT_RESUME, "select"))
                .with_child(Element::new(SELECT_JOB, "select")),
        )
        .with_child(
            Element::new(MATCH_RESULTS, "div")
                .hidden()
                .with_child(
                    Element::new("match-progress", "div")
                        .with_classes(PROGRESS_CIRCLE_CLASS)
                        .with_child(Element::new(MATCH_PERCENTAGE, "span")),
                )
                .with_child(Element::new(MATCHING_SKILLS, "div").with_classes("skill-tags"))
                .with_child(Element::new(MISSING_SKILLS, "div").with_classes("skill-tags"))
                .with_child(Element::new(MATCH_BREAKDOWN, "div")),
        );

    let jobs = section(JOBS_SECTION, false).with_child(
        Element::new("jobs-table", "table")
            .with_classes("table")
            .with_child(Element::new(JOBS_TABLE_BODY, "tbody")),
    );

    let about = section(ABOUT_SECTION, false);

    let container = Element::new(MAIN_CONTAINER, "div")
        .with_classes(CONTAINER_CLASS)
        .with_child(upload)
        .with_child(match_section)
        .with_child(jobs)
        .with_child(about);

    doc.insert_element(BODY, nav, Position::Last);
    doc.insert_element(BODY, container, Position::Last);
    doc.set_options(SELECT_RESUME, vec![SelectOption::new("", RESUME_SENTINEL)]);
    doc.set_options(SELECT_JOB, vec![SelectOption::new("", JOB_SENTINEL)]);

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_shows_upload_section_only() {
        let doc = default_layout();
        let visible: Vec<_> = doc
            .ids_with_class(CONTENT_SECTION_CLASS)
            .into_iter()
            .filter(|id| doc.is_visible(id))
            .collect();
        assert_eq!(visible, vec![UPLOAD_SECTION]);
        assert!(doc.has_class(NAV_UPLOAD, ACTIVE_CLASS));
    }

    #[test]
    fn test_default_layout_has_sentinel_options() {
        let doc = default_layout();
        assert_eq!(doc.options(SELECT_RESUME).map(|o| o.len()), Some(1));
        assert_eq!(doc.options(SELECT_JOB).map(|o| o.len()), Some(1));
        assert_eq!(doc.first_with_class(CONTAINER_CLASS).as_deref(), Some(MAIN_CONTAINER));
        assert_eq!(
            doc.first_with_class(PROGRESS_CIRCLE_CLASS).as_deref(),
            Some("match-progress")
        );
    }
}
