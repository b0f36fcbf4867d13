//! User settings
//!
//! Loading flow:
//! 1. Start with [`OverlaySettings::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply environment variable overrides
//!
//! The file lives at `$ECHOCAST_SETTINGS` when set, otherwise at
//! `~/.echocast/settings.json`.

use crate::overlay::KindFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default window for synthesizing a double-click from two clicks
pub const DEFAULT_DOUBLE_CLICK_THRESHOLD_MS: u64 = 300;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Screen side the overlay is anchored to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPosition {
    Leading,
    #[default]
    Trailing,
}

/// Physical keyboard layout used to label shifted symbol keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardLayout {
    #[default]
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "JIS")]
    Jis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySettings {
    pub position: OverlayPosition,
    pub keyboard_layout: KeyboardLayout,
    /// Used by the capture layer only; the overlay's click de-duplication
    /// window is fixed
    pub double_click_threshold_ms: u64,
    pub filters: KindFilter,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            position: OverlayPosition::default(),
            keyboard_layout: KeyboardLayout::default(),
            double_click_threshold_ms: DEFAULT_DOUBLE_CLICK_THRESHOLD_MS,
            filters: KindFilter::default(),
        }
    }
}

/// Resolve the path to the settings file
pub fn settings_path() -> PathBuf {
    if let Ok(path) = std::env::var("ECHOCAST_SETTINGS") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".echocast").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> SettingsResult<OverlaySettings> {
    let mut settings = load_settings_from_path(&settings_path())?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Load settings from a specific path.
///
/// A missing file yields the defaults; a file with invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> SettingsResult<OverlaySettings> {
    let defaults = serde_json::to_value(OverlaySettings::default())?;

    let merged = if path.exists() {
        tracing::debug!(?path, "Loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        tracing::debug!(?path, "Settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Write settings as pretty JSON, creating parent directories.
pub fn save_settings_to_path(settings: &OverlaySettings, path: &Path) -> SettingsResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(settings)?;
    std::fs::write(path, data)?;
    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}

/// Recursive merge: objects merge per key, everything else is replaced,
/// nulls in `source` are skipped.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = match target_map.remove(&key) {
                    Some(target_val) => deep_merge(target_val, source_val),
                    None => source_val,
                };
                target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

fn apply_env_overrides(settings: &mut OverlaySettings) {
    if let Ok(value) = std::env::var("ECHOCAST_KEYBOARD_LAYOUT") {
        match value.to_ascii_uppercase().as_str() {
            "US" => settings.keyboard_layout = KeyboardLayout::Us,
            "JIS" => settings.keyboard_layout = KeyboardLayout::Jis,
            other => tracing::warn!("Ignoring unknown ECHOCAST_KEYBOARD_LAYOUT={}", other),
        }
    }
    if let Ok(value) = std::env::var("ECHOCAST_DOUBLE_CLICK_MS") {
        match value.parse::<u64>() {
            Ok(ms) => settings.double_click_threshold_ms = ms,
            Err(_) => tracing::warn!("Ignoring invalid ECHOCAST_DOUBLE_CLICK_MS={}", value),
        }
    }
}
