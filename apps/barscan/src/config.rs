//! # Station Configuration
//!
//! Configuration for a scanning station.
//!
//! ## Configuration Priority
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BARSCAN_LOCALE=en                                                   │
//! │     BARSCAN_API_URL=https://crm.example.com                             │
//! │     BARSCAN_SUPPRESSION_WINDOW_MS=1500                                  │
//! │     BARSCAN_EXPORT_DIR=/srv/exports                                     │
//! │                                                                         │
//! │  2. Config File (barscan.toml)                                         │
//! │     Location: ~/.config/barscan/barscan.toml (Linux)                   │
//! │     or the path given with --config                                     │
//! │                                                                         │
//! │  3. Defaults (lowest priority)                                         │
//! │     Rear camera, 1280x720, CODE_128 only, 1000 ms window, Vietnamese   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! [camera]
//! facing = "environment"
//! ideal_width = 1280
//! ideal_height = 720
//!
//! [scan]
//! suppression_window_ms = 1000
//! frame_interval_ms = 16
//! formats = ["CODE_128", "QR_CODE"]
//!
//! [ui]
//! locale = "vi"
//!
//! [lookup]
//! api_url = "http://localhost:3000"
//! timeout_secs = 10
//!
//! [export]
//! directory = "/home/cashier/Downloads"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use barscan_capture::{CameraConstraints, DecodeHints, FacingMode, SessionConfig};
use barscan_core::validation::{validate_positive_ms, validate_resolution};
use barscan_core::{Locale, Symbology, DEFAULT_SUPPRESSION_WINDOW_MS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Camera Settings
// =============================================================================

/// Requested camera stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Which way the camera should face.
    #[serde(default)]
    pub facing: FacingMode,

    /// Preferred frame width in pixels.
    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    /// Preferred frame height in pixels.
    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,
}

fn default_ideal_width() -> u32 {
    1280
}

fn default_ideal_height() -> u32 {
    720
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            facing: FacingMode::default(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
        }
    }
}

// =============================================================================
// Scan Settings
// =============================================================================

/// Decode loop and dedup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Repeats of the last accepted value inside this window are dropped.
    #[serde(default = "default_suppression_window_ms")]
    pub suppression_window_ms: u64,

    /// Pause between decode attempts.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Symbologies the decoder looks for.
    #[serde(default = "default_formats")]
    pub formats: Vec<Symbology>,
}

fn default_suppression_window_ms() -> u64 {
    DEFAULT_SUPPRESSION_WINDOW_MS
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_formats() -> Vec<Symbology> {
    vec![Symbology::Code128]
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            suppression_window_ms: default_suppression_window_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            formats: default_formats(),
        }
    }
}

// =============================================================================
// UI Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Language for notices and timestamps.
    #[serde(default)]
    pub locale: Locale,
}

// =============================================================================
// Lookup Settings
// =============================================================================

/// Customer directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSettings {
    /// Base URL; requests go to `{api_url}/api/customer/code/{code}`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    barscan_lookup::DEFAULT_TIMEOUT_SECS
}

impl Default for LookupSettings {
    fn default() -> Self {
        LookupSettings {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// =============================================================================
// Export Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Where exported CSV files are written.
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
}

/// The platform download folder, or the working directory when there is none.
fn default_export_directory() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            directory: default_export_directory(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete station configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub camera: CameraSettings,

    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub lookup: LookupSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (barscan.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml()?)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Renders the configuration as pretty TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_positive_ms("scan.suppression_window_ms", self.scan.suppression_window_ms)?;
        validate_positive_ms("scan.frame_interval_ms", self.scan.frame_interval_ms)?;
        validate_resolution(self.camera.ideal_width, self.camera.ideal_height)?;

        if self.scan.formats.is_empty() {
            return Err(ConfigError::Invalid(
                "scan.formats must name at least one symbology".into(),
            ));
        }

        let url = &self.lookup.api_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "lookup.timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `BARSCAN_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(locale) = var("BARSCAN_LOCALE") {
            match locale.parse::<Locale>() {
                Ok(parsed) => {
                    debug!(locale = %parsed, "Overriding locale from environment");
                    self.ui.locale = parsed;
                }
                Err(_) => warn!(locale = %locale, "Unknown locale in environment"),
            }
        }

        if let Some(url) = var("BARSCAN_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.lookup.api_url = url;
        }

        if let Some(window) = var("BARSCAN_SUPPRESSION_WINDOW_MS") {
            match window.parse::<u64>() {
                Ok(ms) => self.scan.suppression_window_ms = ms,
                Err(_) => warn!(value = %window, "Ignoring non-numeric suppression window"),
            }
        }

        if let Some(dir) = var("BARSCAN_EXPORT_DIR") {
            self.export.directory = PathBuf::from(dir);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "barscan", "scanner")
            .map(|dirs| dirs.config_dir().join("barscan.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Builds the capture session settings.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            constraints: CameraConstraints {
                facing: self.camera.facing,
                ideal_width: self.camera.ideal_width,
                ideal_height: self.camera.ideal_height,
                audio: false,
            },
            hints: DecodeHints::formats(self.scan.formats.iter().copied()),
            suppression_window: Duration::from_millis(self.scan.suppression_window_ms),
            frame_interval: Duration::from_millis(self.scan.frame_interval_ms),
            locale: self.ui.locale,
        }
    }

    pub fn locale(&self) -> Locale {
        self.ui.locale
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup.timeout_secs)
    }
}
