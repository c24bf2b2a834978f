// src/ui/notify.rs
//! Dismissible alert banners with auto-dismiss

use std::time::Duration;
use tracing::{debug, error, info};

use crate::types::{Notification, Severity};
use crate::ui::dom::{DocumentHandle, Position};
use crate::ui::{page, render};

pub const ALERT_DISMISS_AFTER: Duration = Duration::from_millis(5000);

#[derive(Clone)]
pub struct Notifier {
    document: DocumentHandle,
    dismiss_after: Duration,
}

impl Notifier {
    pub fn new(document: DocumentHandle, dismiss_after: Duration) -> Self {
        Self {
            document,
            dismiss_after,
        }
    }

    /// Show `message` at the top of the page container.
    ///
    /// Returns `None` when nothing was shown (empty message or no container).
    pub async fn notify(&self, message: &str, severity: Severity) -> Option<Notification> {
        if message.is_empty() {
            return None;
        }

        let notification = Notification::new(message, severity);
        {
            let mut doc = self.document.lock().await;
            let Some(container) = doc.first_with_class(page::CONTAINER_CLASS) else {
                error!("Container not found for alert");
                return None;
            };
            doc.insert_element(
                &container,
                render::alert_element(&notification),
                Position::First,
            );
        }
        info!("[{}] {}", severity, message);

        let notifier = self.clone();
        let id = notification.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(notifier.dismiss_after).await;
            notifier.dismiss(&id).await;
        });

        Some(notification)
    }

    /// Close an alert through the UI toolkit, removing it directly if the
    /// toolkit is unavailable. Returns `false` if it was already gone.
    pub async fn dismiss(&self, id: &str) -> bool {
        let mut doc = self.document.lock().await;
        if !doc.contains(id) {
            return false;
        }
        if let Err(e) = doc.close_alert(id) {
            debug!("Toolkit alert close failed ({}), removing {}", e, id);
            doc.remove_element(id);
        }
        true
    }
}
