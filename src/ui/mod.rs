// src/ui/mod.rs
//! Headless controller of the resume-matcher page

use std::time::Duration;

pub mod controller;
pub mod dom;
pub mod loading;
pub mod navigation;
pub mod notify;
pub mod page;
pub mod render;

pub use controller::{ClickTarget, UiController, UiEvent};
pub use dom::{Document, DocumentHandle, Element, MemoryDocument, Position, SelectOption};
pub use loading::LoadingController;
pub use navigation::Navigation;
pub use notify::Notifier;

/// Timer durations of the page chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiTimings {
    pub alert_dismiss: Duration,
    pub loading_timeout: Duration,
}

impl Default for UiTimings {
    fn default() -> Self {
        Self {
            alert_dismiss: notify::ALERT_DISMISS_AFTER,
            loading_timeout: loading::LOADING_TIMEOUT,
        }
    }
}
