//! Engine settings snapshot and the source it is read from.
//!
//! Settings are owned by the surrounding application.  The engine calls
//! [`SettingsSource::snapshot`] once per trigger so a speed or binding change
//! takes effect on the very next key press without restarting the engine.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-step hold time in milliseconds.
pub const DEFAULT_LATENCY_MS: u32 = 20;

/// Which physical key stands for each abstract direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingScheme {
    /// Cursor keys.
    #[default]
    Arrows,
    /// W/A/S/D.
    Wasd,
    /// E/S/D/F.
    Esdf,
}

impl BindingScheme {
    /// Interprets a free-form settings value.
    ///
    /// Unrecognised values fall back to [`BindingScheme::Arrows`].
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "wasd" => BindingScheme::Wasd,
            "esdf" => BindingScheme::Esdf,
            _ => BindingScheme::Arrows,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingScheme::Arrows => "arrows",
            BindingScheme::Wasd => "wasd",
            BindingScheme::Esdf => "esdf",
        }
    }
}

/// Which class of physical keys the engine listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Only numeric keypad keys are considered; everything else passes through.
    #[default]
    Numpad,
    /// Any physical key may be a slot.
    Custom,
}

/// Immutable settings snapshot taken at trigger time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Hold time after each synthetic press and each release.
    pub latency_ms: u32,
    pub binding_scheme: BindingScheme,
    /// Play an audible cue after each completed macro.
    pub sound_enabled: bool,
    /// Show a transient status message after each completed macro.
    pub visual_enabled: bool,
    pub layout: LayoutKind,
}

impl EngineSettings {
    /// Per-step delay as a [`Duration`], never shorter than one millisecond.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(u64::from(self.latency_ms.max(1)))
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
            binding_scheme: BindingScheme::Arrows,
            sound_enabled: false,
            visual_enabled: true,
            layout: LayoutKind::Numpad,
        }
    }
}

/// Read-only access to the current settings.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsSource: Send + Sync {
    /// Returns the settings as they are right now.
    fn snapshot(&self) -> EngineSettings;
}

/// Settings cell shared between the host application (writer) and the engine (reader).
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<EngineSettings>>,
}

impl SharedSettings {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Applies `change` atomically; readers see either the old or the new value.
    pub fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut EngineSettings),
    {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        change(&mut guard);
    }
}

impl SettingsSource for SharedSettings {
    fn snapshot(&self) -> EngineSettings {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_scheme_from_setting_falls_back_to_arrows() {
        assert_eq!(BindingScheme::from_setting("WASD"), BindingScheme::Wasd);
        assert_eq!(BindingScheme::from_setting("esdf"), BindingScheme::Esdf);
        assert_eq!(BindingScheme::from_setting("joystick"), BindingScheme::Arrows);
    }

    #[test]
    fn test_latency_is_clamped_to_one_millisecond() {
        let settings = EngineSettings {
            latency_ms: 0,
            ..EngineSettings::default()
        };
        assert_eq!(settings.latency(), Duration::from_millis(1));
    }

    #[test]
    fn test_defaults_match_first_run_values() {
        let settings = EngineSettings::default();
        assert_eq!(settings.latency_ms, 20);
        assert_eq!(settings.binding_scheme, BindingScheme::Arrows);
        assert!(!settings.sound_enabled);
        assert!(settings.visual_enabled);
    }

    #[test]
    fn test_shared_settings_update_is_visible_to_next_snapshot() {
        // Arrange
        let shared = SharedSettings::default();
        let before = shared.snapshot();

        // Act
        shared.update(|s| {
            s.latency_ms = 45;
            s.binding_scheme = BindingScheme::Wasd;
        });

        // Assert
        let after = shared.snapshot();
        assert_eq!(before.latency_ms, 20);
        assert_eq!(after.latency_ms, 45);
        assert_eq!(after.binding_scheme, BindingScheme::Wasd);
    }

    #[test]
    fn test_mock_settings_source_returns_configured_snapshot() {
        let mut source = MockSettingsSource::new();
        source.expect_snapshot().times(1).returning(|| EngineSettings {
            latency_ms: 5,
            ..EngineSettings::default()
        });

        assert_eq!(source.snapshot().latency_ms, 5);
    }
}
