use crate::color::{Color, BLACK};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SETTINGS_FILE_NAME: &str = "sketchpad_settings.json";
pub const DEFAULT_WINDOW_TITLE: &str = "sketchpad window (r-click to save)";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

fn default_window_title() -> String {
    DEFAULT_WINDOW_TITLE.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_pen_color() -> Color {
    BLACK
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanvasSettings {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    /// Length of one wait slice in `show`; input is polled after each slice.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pen color a canvas starts with.
    #[serde(default = "default_pen_color")]
    pub pen_color: Color,
    /// When enabled the logger runs at debug level and honors `RUST_LOG`.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            poll_interval_ms: default_poll_interval_ms(),
            pen_color: default_pen_color(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl CanvasSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

/// Loads the settings file next to the executable, falling back to defaults
/// when it does not exist.
pub fn load() -> Result<CanvasSettings> {
    load_from_path(&resolve_settings_path()?)
}

pub fn load_from_path(path: &Path) -> Result<CanvasSettings> {
    if !path.exists() {
        return Ok(CanvasSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(CanvasSettings::default());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("deserialize settings file {}", path.display()))
}

pub fn save_to_path(path: &Path, settings: &CanvasSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create settings parent folder {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(settings).context("serialize settings")?;
    std::fs::write(path, json).with_context(|| format!("write settings file {}", path.display()))
}
