//! TOML-based configuration for the numpad macro runner.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\NumpadMacros\config.toml`
//! - Linux:    `~/.config/numpad-macros/config.toml`
//! - macOS:    `~/Library/Application Support/NumpadMacros/config.toml`
//!
//! Example:
//!
//! ```toml
//! log_level = "info"
//!
//! [engine]
//! macros_enabled = true
//! latency_ms = 20
//! keybind_mode = "wasd"
//!
//! [layout]
//! kind = "numpad"
//!
//! [[slots]]
//! scan_code = 71
//! stratagem = "Reinforce"
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default ...)]`, so an empty file, a partial
//! file, or no file at all yields a working configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stratagem_core::{
    BindingScheme, DomainError, EngineSettings, LayoutKind, PhysicalKeyId, SlotTable,
    StratagemLookup,
};
use thiserror::Error;
use tracing::warn;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The content parsed but describes an impossible setup.
    #[error("invalid config: {0}")]
    Validation(String),

    /// The layout or a slot assignment was rejected.
    #[error("invalid layout: {0}")]
    Layout(#[from] DomainError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Stratagem assignments, one per slot.
    #[serde(default)]
    pub slots: Vec<SlotEntry>,
}

/// Engine behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Enable the engine at start-up.
    #[serde(default)]
    pub macros_enabled: bool,
    /// Hold time after each press and each release, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u32,
    /// `"arrows"`, `"wasd"` or `"esdf"`.
    #[serde(default = "default_keybind_mode")]
    pub keybind_mode: String,
    #[serde(default)]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub visual_enabled: bool,
}

/// Which keys are slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutConfig {
    #[serde(default)]
    pub kind: LayoutKind,
    /// Only used when `kind = "custom"`.
    #[serde(default)]
    pub custom_keys: Vec<CustomKeyEntry>,
}

/// One captured key of a custom layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomKeyEntry {
    pub scan_code: u16,
    pub label: String,
}

/// One slot assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotEntry {
    pub scan_code: u16,
    pub stratagem: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_latency_ms() -> u32 {
    stratagem_core::domain::settings::DEFAULT_LATENCY_MS
}
fn default_keybind_mode() -> String {
    "arrows".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            engine: EngineConfig::default(),
            layout: LayoutConfig::default(),
            slots: Vec::new(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            macros_enabled: false,
            latency_ms: default_latency_ms(),
            keybind_mode: default_keybind_mode(),
            sound_enabled: false,
            visual_enabled: default_true(),
        }
    }
}

// ── Conversion into engine types ──────────────────────────────────────────────

impl AppConfig {
    /// Checks constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero latency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.latency_ms == 0 {
            return Err(ConfigError::Validation(
                "engine.latency_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The settings snapshot the engine starts with.
    pub fn engine_settings(&self) -> EngineSettings {
        let binding_scheme = BindingScheme::from_setting(&self.engine.keybind_mode);
        if binding_scheme.as_str() != self.engine.keybind_mode.trim().to_ascii_lowercase() {
            warn!(
                keybind_mode = %self.engine.keybind_mode,
                "unknown keybind mode; using arrows"
            );
        }
        EngineSettings {
            latency_ms: self.engine.latency_ms.max(1),
            binding_scheme,
            sound_enabled: self.engine.sound_enabled,
            visual_enabled: self.engine.visual_enabled,
            layout: self.layout.kind,
        }
    }

    /// Builds the slot table and applies the configured assignments.
    ///
    /// A stratagem name unknown to `stratagems` is kept (the key will be
    /// suppressed without playback) and logged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Layout`] for an oversized or duplicated custom
    /// layout, or an assignment to a key outside the layout.
    pub fn build_slot_table(&self, stratagems: &dyn StratagemLookup) -> Result<SlotTable, ConfigError> {
        let table = match self.layout.kind {
            LayoutKind::Numpad => SlotTable::numpad(),
            LayoutKind::Custom => SlotTable::custom(
                self.layout
                    .custom_keys
                    .iter()
                    .map(|k| (PhysicalKeyId(k.scan_code), k.label.clone())),
            )?,
        };

        for entry in &self.slots {
            if stratagems.lookup(&entry.stratagem).is_none() {
                warn!(
                    scan_code = entry.scan_code,
                    stratagem = %entry.stratagem,
                    "slot assigned to an unknown stratagem"
                );
            }
            table.assign(PhysicalKeyId(entry.scan_code), entry.stratagem.clone())?;
        }
        Ok(table)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads and validates `AppConfig` from `path`, returning
/// `AppConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::Validation`] if a value is out of range.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<AppConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("NumpadMacros"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("numpad-macros"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("NumpadMacros")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
