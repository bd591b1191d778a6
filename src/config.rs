use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{PreviewError, Result};
use crate::geometry::{MonitorInfo, Rect};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub trigger_enabled: bool,
    pub text_preview_limit: u64,
    pub log_filter: String,
    pub fallback_monitor: MonitorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            trigger_enabled: true,
            text_preview_limit: 1024 * 1024,
            log_filter: "info".to_string(),
            fallback_monitor: MonitorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub scale: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            scale: 1.0,
        }
    }
}

impl MonitorConfig {
    pub fn to_monitor(self) -> MonitorInfo {
        let scale = if self.scale.is_finite() && self.scale > 0.0 { self.scale } else { 1.0 };
        MonitorInfo::with_scale(Rect::new(self.x, self.y, self.width, self.height), scale)
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "RustQuickLook", "RustQuickLook")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    // Reads the configuration. A missing file yields the defaults; the file
    // is never written.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(PreviewError::io(path, err)),
        };

        serde_json::from_str(&content).map_err(|source| PreviewError::Config { path, source })
    }
}
