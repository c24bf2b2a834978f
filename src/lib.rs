use anyhow::Result;
use std::sync::Arc;

pub mod cli;
pub mod core;
pub mod types;
pub mod ui;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

use crate::core::{ApiClient, ConfigManager};
use crate::ui::{DocumentHandle, UiController};

/// Build a controller wired to the configured matching backend
pub fn build_controller(config: &ConfigManager, document: DocumentHandle) -> Result<UiController> {
    let api = ApiClient::new(config.service.base_url.clone(), config.request_timeout())?;
    Ok(UiController::new(document, Arc::new(api), config.timings()))
}
