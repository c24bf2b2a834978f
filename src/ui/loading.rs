// src/ui/loading.rs
//! Single loading overlay with a slow-operation watchdog

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::types::Severity;
use crate::ui::dom::{DocumentHandle, Position};
use crate::ui::notify::Notifier;
use crate::ui::{page, render};

pub const LOADING_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";
pub const SLOW_OPERATION_MESSAGE: &str = "The operation is taking longer than expected. Please check your network connection or try again later.";

struct Watchdog {
    generation: u64,
    handle: JoinHandle<()>,
}

struct LoadingInner {
    document: DocumentHandle,
    notifier: Notifier,
    timeout: Duration,
    watchdog: Mutex<Option<Watchdog>>,
    generation: AtomicU64,
}

/// Owner of the page's loading overlay.
///
/// At most one overlay and one pending watchdog exist; `begin` replaces the
/// watchdog of any earlier operation.
#[derive(Clone)]
pub struct LoadingController {
    inner: Arc<LoadingInner>,
}

impl LoadingController {
    pub fn new(document: DocumentHandle, notifier: Notifier, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(LoadingInner {
                document,
                notifier,
                timeout,
                watchdog: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub async fn begin(&self, message: &str) {
        let message = if message.is_empty() {
            DEFAULT_LOADING_MESSAGE
        } else {
            message
        };
        debug!("Loading: {}", message);

        {
            let mut doc = self.inner.document.lock().await;
            if !doc.contains(page::LOADING_INDICATOR) {
                doc.insert_element(page::BODY, render::loading_overlay(), Position::Last);
            }
            doc.set_text(page::LOADING_MESSAGE, message);
            doc.set_style(page::LOADING_INDICATOR, "display", "flex");
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut slot = self.inner.watchdog.lock().await;
        if let Some(previous) = slot.take() {
            previous.handle.abort();
        }

        let controller = self.clone();
        let timeout = self.inner.timeout;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            controller.expire(generation).await;
        });
        *slot = Some(Watchdog { generation, handle });
    }

    /// Cancel the watchdog and remove the overlay. Safe to call when idle.
    pub async fn end(&self) {
        if let Some(watchdog) = self.inner.watchdog.lock().await.take() {
            watchdog.handle.abort();
        }
        self.remove_overlay().await;
    }

    pub async fn is_active(&self) -> bool {
        self.inner.document.lock().await.contains(page::LOADING_INDICATOR)
    }

    async fn expire(&self, generation: u64) {
        {
            let mut slot = self.inner.watchdog.lock().await;
            match slot.as_ref() {
                Some(watchdog) if watchdog.generation == generation => {
                    slot.take();
                }
                _ => return,
            }
        }

        warn!(
            "Loading operation timed out after {} seconds",
            self.inner.timeout.as_secs()
        );
        self.remove_overlay().await;
        self.inner
            .notifier
            .notify(SLOW_OPERATION_MESSAGE, Severity::Warning)
            .await;
    }

    async fn remove_overlay(&self) {
        self.inner
            .document
            .lock()
            .await
            .remove_element(page::LOADING_INDICATOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dom::{Document, MemoryDocument};
    use crate::ui::notify::ALERT_DISMISS_AFTER;

    fn setup() -> (Arc<Mutex<MemoryDocument>>, LoadingController) {
        let shared = Arc::new(Mutex::new(page::default_layout()));
        let handle: DocumentHandle = shared.clone();
        let notifier = Notifier::new(handle.clone(), ALERT_DISMISS_AFTER);
        (shared, LoadingController::new(handle, notifier, LOADING_TIMEOUT))
    }

    #[tokio::test]
    async fn test_end_without_overlay_is_a_no_op() {
        let (shared, loading) = setup();
        loading.end().await;
        loading.end().await;
        assert!(!shared.lock().await.contains(page::LOADING_INDICATOR));
    }

    #[tokio::test]
    async fn test_overlapping_begin_keeps_single_overlay() {
        let (shared, loading) = setup();
        loading.begin("Loading resumes...").await;
        loading.begin("Loading jobs...").await;

        let doc = shared.lock().await;
        let overlays: Vec<_> = doc
            .children(page::BODY)
            .into_iter()
            .filter(|id| id == page::LOADING_INDICATOR)
            .collect();
        assert_eq!(overlays.len(), 1);
        assert_eq!(doc.text(page::LOADING_MESSAGE).as_deref(), Some("Loading jobs..."));
    }

    #[tokio::test]
    async fn test_end_removes_overlay_node() {
        let (shared, loading) = setup();
        loading.begin("").await;
        assert_eq!(
            shared.lock().await.text(page::LOADING_MESSAGE).as_deref(),
            Some(DEFAULT_LOADING_MESSAGE)
        );
        assert!(loading.is_active().await);

        loading.end().await;
        let doc = shared.lock().await;
        assert!(!doc.contains(page::LOADING_INDICATOR));
        assert!(!doc.contains(page::LOADING_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_ends_loading_with_warning() {
        let (shared, loading) = setup();
        loading.begin("Calculating match...").await;

        tokio::time::sleep(LOADING_TIMEOUT + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        let doc = shared.lock().await;
        assert!(!doc.contains(page::LOADING_INDICATOR));
        let alerts = doc.alerts(page::MAIN_CONTAINER);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, "warning");
        assert_eq!(alerts[0].message, SLOW_OPERATION_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_replaces_pending_watchdog() {
        let (shared, loading) = setup();
        loading.begin("first").await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        loading.begin("second").await;

        // The first watchdog would have fired at 30s.
        tokio::time::sleep(Duration::from_secs(15)).await;
        tokio::task::yield_now().await;
        {
            let doc = shared.lock().await;
            assert!(doc.contains(page::LOADING_INDICATOR));
            assert!(doc.alerts(page::MAIN_CONTAINER).is_empty());
        }

        tokio::time::sleep(Duration::from_secs(16)).await;
        tokio::task::yield_now().await;
        let doc = shared.lock().await;
        assert!(!doc.contains(page::LOADING_INDICATOR));
        assert_eq!(doc.alerts(page::MAIN_CONTAINER).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_cancels_watchdog() {
        let (shared, loading) = setup();
        loading.begin("Deleting job...").await;
        loading.end().await;

        tokio::time::sleep(LOADING_TIMEOUT * 2).await;
        tokio::task::yield_now().await;
        assert!(shared.lock().await.alerts(page::MAIN_CONTAINER).is_empty());
    }
}
