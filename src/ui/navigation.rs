// src/ui/navigation.rs
use tracing::debug;

use crate::ui::dom::Document;
use crate::ui::page;

/// Mapping from navigation links to the content sections they reveal.
#[derive(Debug, Clone)]
pub struct Navigation {
    routes: Vec<(String, String)>,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(&[
            (page::NAV_UPLOAD, page::UPLOAD_SECTION),
            (page::NAV_MATCH, page::MATCH_SECTION),
            (page::NAV_JOBS, page::JOBS_SECTION),
            (page::NAV_ABOUT, page::ABOUT_SECTION),
        ])
    }
}

impl Navigation {
    pub fn new(routes: &[(&str, &str)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|(trigger, section)| (trigger.to_string(), section.to_string()))
                .collect(),
        }
    }

    pub fn section_for(&self, trigger: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|(t, _)| t == trigger)
            .map(|(_, section)| section.as_str())
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(trigger, _)| trigger.as_str())
    }

    /// Show the section mapped to `trigger` and mark `trigger` active.
    ///
    /// Returns `false` for triggers that are not navigation links. A mapped
    /// section missing from the page is skipped; the active link still moves.
    pub fn activate(&self, doc: &mut dyn Document, trigger: &str) -> bool {
        let Some(section) = self.section_for(trigger) else {
            return false;
        };
        if !doc.contains(trigger) {
            return false;
        }

        for id in doc.ids_with_class(page::CONTENT_SECTION_CLASS) {
            doc.set_visible(&id, false);
        }
        if !doc.set_visible(section, true) {
            debug!("Section {} not found for {}", section, trigger);
        }

        for id in doc.ids_with_class(page::NAV_LINK_CLASS) {
            doc.remove_class(&id, page::ACTIVE_CLASS);
        }
        doc.add_class(trigger, page::ACTIVE_CLASS);
        true
    }
}
