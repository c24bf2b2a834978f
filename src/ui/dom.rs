// src/ui/dom.rs
//! Document surface driven by the controller.
//!
//! `Document` is the element-id contract the controller renders into. Every
//! mutating call returns `false` when the target element is missing so
//! handlers can skip silently instead of failing.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::types::ResumeUpload;

/// Shared handle to the page, used by the controller and its timers.
pub type DocumentHandle = Arc<Mutex<dyn Document>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Last,
}

/// Detached element tree, inserted with [`Document::insert_element`].
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub id: String,
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub html: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_classes(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.style.insert(property.to_string(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn hidden(self) -> Self {
        self.with_style("display", "none")
    }
}

pub trait Document: Send {
    fn contains(&self, id: &str) -> bool;
    /// Ids of elements carrying `class`, in document order.
    fn ids_with_class(&self, class: &str) -> Vec<String>;
    fn first_with_class(&self, class: &str) -> Option<String> {
        self.ids_with_class(class).into_iter().next()
    }
    fn children(&self, id: &str) -> Vec<String>;

    fn has_class(&self, id: &str, class: &str) -> bool;
    fn add_class(&mut self, id: &str, class: &str) -> bool;
    fn remove_class(&mut self, id: &str, class: &str) -> bool;
    fn attribute(&self, id: &str, name: &str) -> Option<String>;

    fn style(&self, id: &str, property: &str) -> Option<String>;
    fn set_style(&mut self, id: &str, property: &str, value: &str) -> bool;
    fn is_visible(&self, id: &str) -> bool {
        self.contains(id) && self.style(id, "display").as_deref() != Some("none")
    }
    fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        self.set_style(id, "display", if visible { "block" } else { "none" })
    }

    fn text(&self, id: &str) -> Option<String>;
    fn set_text(&mut self, id: &str, text: &str) -> bool;
    fn inner_html(&self, id: &str) -> Option<String>;
    fn set_inner_html(&mut self, id: &str, html: &str) -> bool;

    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&mut self, id: &str, value: &str) -> bool;
    fn selected_file(&self, id: &str) -> Option<ResumeUpload>;
    fn options(&self, id: &str) -> Option<Vec<SelectOption>>;
    /// Replace the option list; the selection falls back to the first option.
    fn set_options(&mut self, id: &str, options: Vec<SelectOption>) -> bool;
    /// Clear values and file selections of every control inside the form.
    fn reset_form(&mut self, id: &str) -> bool;

    fn insert_element(&mut self, parent: &str, element: Element, position: Position) -> bool;
    fn remove_element(&mut self, id: &str) -> bool;

    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, message: &str) -> bool;
    /// UI toolkit modal-show behaviour.
    fn show_modal(&mut self, id: &str) -> Result<()>;
    /// UI toolkit alert-close behaviour.
    fn close_alert(&mut self, id: &str) -> Result<()>;
}

/// Attribute holding an alert's creation time (RFC 3339).
pub const ALERT_CREATED_AT: &str = "data-created-at";

const FORM_CONTROL_TAGS: &[&str] = &["input", "select", "textarea"];

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    html: String,
    value: String,
    file: Option<ResumeUpload>,
    options: Vec<SelectOption>,
    parent: Option<String>,
    children: Vec<String>,
}

/// In-memory page used by the command line shell and the tests.
#[derive(Debug)]
pub struct MemoryDocument {
    root: String,
    nodes: HashMap<String, Node>,
    toolkit: bool,
    confirm_answer: bool,
    prompts: Vec<String>,
}

/// Alert banner as currently shown on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSnapshot {
    pub id: String,
    pub severity: String,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl MemoryDocument {
    pub fn new(root: &str) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            root.to_string(),
            Node {
                tag: "body".to_string(),
                ..Default::default()
            },
        );

        Self {
            root: root.to_string(),
            nodes,
            toolkit: true,
            confirm_answer: true,
            prompts: Vec::new(),
        }
    }

    /// Simulate a page where the UI toolkit script failed to load.
    pub fn without_toolkit(mut self) -> Self {
        self.toolkit = false;
        self
    }

    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn select_file(&mut self, id: &str, file: Option<ResumeUpload>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.file = file;
                true
            }
            None => false,
        }
    }

    /// Alerts inside `container`, newest first.
    pub fn alerts(&self, container: &str) -> Vec<AlertSnapshot> {
        self.children(container)
            .into_iter()
            .filter_map(|id| {
                let node = self.nodes.get(&id)?;
                if !node.classes.iter().any(|c| c == "alert") {
                    return None;
                }
                let severity = node
                    .classes
                    .iter()
                    .filter_map(|c| c.strip_prefix("alert-"))
                    .find(|s| *s != "dismissible")?
                    .to_string();
                let created_at = self
                    .attribute(&id, ALERT_CREATED_AT)
                    .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                    .map(|at| at.with_timezone(&Utc));
                Some(AlertSnapshot {
                    message: node.text.clone(),
                    id,
                    severity,
                    created_at,
                })
            })
            .collect()
    }

    fn preorder(&self) -> Vec<String> {
        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().cloned());
            }
            ordered.push(id);
        }
        ordered
    }

    fn descendants(&self, id: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut stack: Vec<String> = match self.nodes.get(id) {
            Some(node) => node.children.clone(),
            None => return found,
        };
        while let Some(child) = stack.pop() {
            if let Some(node) = self.nodes.get(&child) {
                stack.extend(node.children.iter().cloned());
            }
            found.push(child);
        }
        found
    }

    fn register(&mut self, parent: &str, element: Element) -> String {
        let Element {
            id,
            tag,
            classes,
            attributes,
            style,
            text,
            html,
            children,
        } = element;

        if self.nodes.contains_key(&id) {
            self.remove_element(&id);
        }

        self.nodes.insert(
            id.clone(),
            Node {
                tag,
                classes,
                attributes,
                style,
                text,
                html,
                parent: Some(parent.to_string()),
                ..Default::default()
            },
        );

        for child in children {
            let child_id = self.register(&id, child);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children.push(child_id);
            }
        }

        id
    }

    fn with_node<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Node),
    {
        match self.nodes.get_mut(id) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }
}

impl Document for MemoryDocument {
    fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.preorder()
            .into_iter()
            .filter(|id| self.has_class(id, class))
            .collect()
    }

    fn children(&self, id: &str) -> Vec<String> {
        self.nodes
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.nodes
            .get(id)
            .map(|node| node.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, id: &str, class: &str) -> bool {
        self.with_node(id, |node| {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        })
    }

    fn remove_class(&mut self, id: &str, class: &str) -> bool {
        self.with_node(id, |node| node.classes.retain(|c| c != class))
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.nodes.get(id)?.attributes.get(name).cloned()
    }

    fn style(&self, id: &str, property: &str) -> Option<String> {
        self.nodes.get(id)?.style.get(property).cloned()
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) -> bool {
        self.with_node(id, |node| {
            node.style.insert(property.to_string(), value.to_string());
        })
    }

    fn text(&self, id: &str) -> Option<String> {
        self.nodes.get(id).map(|node| node.text.clone())
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.with_node(id, |node| node.text = text.to_string())
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        self.nodes.get(id).map(|node| node.html.clone())
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        self.with_node(id, |node| node.html = html.to_string())
    }

    fn value(&self, id: &str) -> Option<String> {
        self.nodes.get(id).map(|node| node.value.clone())
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        self.with_node(id, |node| node.value = value.to_string())
    }

    fn selected_file(&self, id: &str) -> Option<ResumeUpload> {
        self.nodes.get(id)?.file.clone()
    }

    fn options(&self, id: &str) -> Option<Vec<SelectOption>> {
        self.nodes.get(id).map(|node| node.options.clone())
    }

    fn set_options(&mut self, id: &str, options: Vec<SelectOption>) -> bool {
        self.with_node(id, |node| {
            node.value = options
                .first()
                .map(|option| option.value.clone())
                .unwrap_or_default();
            node.options = options;
        })
    }

    fn reset_form(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        for control in self.descendants(id) {
            self.with_node(&control, |node| {
                if !FORM_CONTROL_TAGS.contains(&node.tag.as_str()) {
                    return;
                }
                node.value = node
                    .options
                    .first()
                    .map(|option| option.value.clone())
                    .unwrap_or_default();
                node.file = None;
            });
        }
        true
    }

    fn insert_element(&mut self, parent: &str, element: Element, position: Position) -> bool {
        if !self.contains(parent) {
            return false;
        }
        let id = self.register(parent, element);
        self.with_node(parent, |node| match position {
            Position::First => node.children.insert(0, id),
            Position::Last => node.children.push(id),
        })
    }

    fn remove_element(&mut self, id: &str) -> bool {
        if id == self.root {
            return false;
        }
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let parent = node.parent.clone();

        for descendant in self.descendants(id) {
            self.nodes.remove(&descendant);
        }
        self.nodes.remove(id);

        if let Some(parent) = parent {
            self.with_node(&parent, |node| node.children.retain(|c| c != id));
        }
        true
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.confirm_answer
    }

    fn show_modal(&mut self, id: &str) -> Result<()> {
        if !self.toolkit {
            anyhow::bail!("UI toolkit is not loaded");
        }
        if !self.contains(id) {
            anyhow::bail!("Modal element not found: {}", id);
        }
        self.add_class(id, "show");
        self.set_style(id, "display", "block");
        self.with_node(id, |node| {
            node.attributes
                .insert("aria-hidden".to_string(), "false".to_string());
        });
        Ok(())
    }

    fn close_alert(&mut self, id: &str) -> Result<()> {
        if !self.toolkit {
            anyhow::bail!("UI toolkit is not loaded");
        }
        self.remove_class(id, "show");
        self.remove_element(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryDocument {
        let mut doc = MemoryDocument::new("body");
        doc.insert_element(
            "body",
            Element::new("main", "div")
                .with_classes("container")
                .with_child(
                    Element::new("form", "form")
                        .with_child(Element::new("title", "input"))
                        .with_child(Element::new("kind", "select")),
                ),
            Position::Last,
        );
        doc
    }

    #[test]
    fn test_nested_elements_are_addressable() {
        let doc = sample();
        assert!(doc.contains("title"));
        assert_eq!(doc.children("form"), vec!["title", "kind"]);
        assert_eq!(doc.first_with_class("container").as_deref(), Some("main"));
    }

    #[test]
    fn test_remove_element_drops_descendants() {
        let mut doc = sample();
        assert!(doc.remove_element("form"));
        assert!(!doc.contains("title"));
        assert!(doc.children("main").is_empty());
        assert!(!doc.remove_element("form"));
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut doc = sample();
        doc.insert_element("main", Element::new("a", "div"), Position::First);
        doc.insert_element("main", Element::new("b", "div"), Position::First);
        assert_eq!(doc.children("main"), vec!["b", "a", "form"]);
    }

    #[test]
    fn test_set_options_resets_selection() {
        let mut doc = sample();
        doc.set_options(
            "kind",
            vec![SelectOption::new("", "Pick..."), SelectOption::new("1", "One")],
        );
        doc.set_value("kind", "1");
        assert_eq!(doc.value("kind").as_deref(), Some("1"));

        doc.set_options("kind", vec![SelectOption::new("", "Pick...")]);
        assert_eq!(doc.value("kind").as_deref(), Some(""));
    }

    #[test]
    fn test_reset_form_clears_controls() {
        let mut doc = sample();
        doc.set_value("title", "Engineer");
        assert!(doc.reset_form("form"));
        assert_eq!(doc.value("title").as_deref(), Some(""));
        assert!(!doc.reset_form("missing"));
    }

    #[test]
    fn test_reset_form_skips_non_controls() {
        let mut doc = sample();
        doc.insert_element(
            "form",
            Element::new("preview", "output"),
            Position::Last,
        );
        doc.set_value("preview", "kept");
        doc.set_value("title", "Engineer");
        doc.reset_form("form");
        assert_eq!(doc.value("preview").as_deref(), Some("kept"));
        assert_eq!(doc.value("title").as_deref(), Some(""));
    }

    #[test]
    fn test_missing_elements_are_no_ops() {
        let mut doc = sample();
        assert!(!doc.set_text("nope", "x"));
        assert!(!doc.add_class("nope", "active"));
        assert!(!doc.is_visible("nope"));
        assert_eq!(doc.value("nope"), None);
    }

    #[test]
    fn test_toolkit_behaviours() {
        let mut doc = sample();
        doc.insert_element("body", Element::new("modal", "div").hidden(), Position::Last);
        doc.show_modal("modal").unwrap();
        assert!(doc.is_visible("modal"));
        assert!(doc.has_class("modal", "show"));

        let mut bare = sample().without_toolkit();
        bare.insert_element("body", Element::new("modal", "div"), Position::Last);
        assert!(bare.show_modal("modal").is_err());
        assert!(bare.close_alert("modal").is_err());
        assert!(bare.contains("modal"));
    }
}
