// src/core/mod.rs
//! Backend access and configuration

pub mod api_client;
pub mod config_manager;

pub use api_client::{ApiClient, MatchingApi};
pub use config_manager::ConfigManager;
