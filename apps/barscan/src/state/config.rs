//! # Configuration State
//!
//! The effective configuration, loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BARSCAN_*`)
//! 2. Config file (`barscan.toml`)
//! 3. Defaults
//!
//! Read-only after initialization, so no mutex.

use std::path::Path;

use barscan_capture::SessionConfig;
use barscan_core::Locale;
use serde::Serialize;

use crate::config::AppConfig;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    config: AppConfig,
}

impl ConfigState {
    pub fn new(config: AppConfig) -> Self {
        ConfigState { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session_config(&self) -> SessionConfig {
        self.config.to_session_config()
    }

    pub fn locale(&self) -> Locale {
        self.config.locale()
    }

    pub fn export_dir(&self) -> &Path {
        &self.config.export.directory
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState::new(AppConfig::default())
    }
}
