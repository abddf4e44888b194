//! MacroEngine: the enable/disable lifecycle around the keyboard hook.
//!
//! ```text
//!            enable()                disable()
//! Disabled ───────────▶ Enabled ───────────────▶ Disabled
//!    ▲  │ (install failed)  │ (already enabled)     │
//!    └──┘                   └── no-op               └── no-op when disabled
//! ```
//!
//! While `Enabled` the engine exclusively owns one [`HookHandle`].  Leaving
//! `Enabled`, by [`MacroEngine::disable`] or by dropping the engine, releases
//! the hook before halting playback, so on return:
//!
//! - no key-down is intercepted or suppressed any more, and
//! - no synthetic key is emitted any more, and none is left held down.

use std::sync::{Arc, Mutex};

use stratagem_core::{SettingsSource, SlotRegistry, StratagemLookup};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::info;

use super::dispatch_key::KeyDispatcher;
use super::feedback::{AudioCue, CompletionEffects, PlaybackBus, PlaybackCompleted, StatusSink};
use super::play_macro::{EmissionGate, KeySynthesizer, MacroPlayer};
use super::schedule::PlaybackScheduler;
use crate::infrastructure::keyboard_hook::{HookError, HookHandle, KeyEventHandler, KeyboardHook};

/// Error type for lifecycle operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Whether the engine currently owns a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Disabled,
    Enabled,
}

/// Collaborators the engine is wired with.
pub struct EnginePorts {
    pub hook: Arc<dyn KeyboardHook>,
    pub synthesizer: Arc<dyn KeySynthesizer>,
    pub slots: Arc<dyn SlotRegistry>,
    pub stratagems: Arc<dyn StratagemLookup>,
    pub settings: Arc<dyn SettingsSource>,
    pub audio: Arc<dyn AudioCue>,
    pub status: Arc<dyn StatusSink>,
}

/// The numpad macro engine.
pub struct MacroEngine {
    hook: Arc<dyn KeyboardHook>,
    dispatcher: Arc<KeyDispatcher>,
    scheduler: Arc<PlaybackScheduler>,
    bus: PlaybackBus,
    installed: Mutex<Option<HookHandle>>,
}

impl MacroEngine {
    /// Builds a disabled engine whose playbacks run on `runtime`.
    pub fn new(runtime: Handle, ports: EnginePorts) -> Self {
        let bus = PlaybackBus::default();
        let effects = CompletionEffects::new(bus.clone(), ports.audio, ports.status);
        let gate = Arc::new(EmissionGate::new(ports.synthesizer));
        let player = Arc::new(MacroPlayer::new(gate, effects));
        let scheduler = Arc::new(PlaybackScheduler::new(runtime, player));
        let dispatcher = Arc::new(KeyDispatcher::new(
            ports.slots,
            ports.stratagems,
            ports.settings,
            Arc::clone(&scheduler),
        ));
        Self {
            hook: ports.hook,
            dispatcher,
            scheduler,
            bus,
            installed: Mutex::new(None),
        }
    }

    /// Installs the keyboard hook.  A no-op when already enabled.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Hook`] if the platform refused the hook; the
    /// engine then stays `Disabled`.
    pub fn enable(&self) -> Result<(), EngineError> {
        let mut installed = self.installed.lock().unwrap_or_else(|e| e.into_inner());
        if installed.is_some() {
            return Ok(());
        }

        self.scheduler.resume();
        let handler: Arc<dyn KeyEventHandler> = self.dispatcher.clone();
        match self.hook.install(handler) {
            Ok(handle) => {
                *installed = Some(handle);
                info!("macro engine enabled");
                Ok(())
            }
            Err(e) => {
                self.scheduler.halt();
                Err(e.into())
            }
        }
    }

    /// Removes the hook and stops all playback.  A no-op when disabled.
    pub fn disable(&self) {
        let mut installed = self.installed.lock().unwrap_or_else(|e| e.into_inner());
        let Some(handle) = installed.take() else {
            return;
        };
        handle.release();
        self.scheduler.halt();
        info!("macro engine disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.state() == EngineState::Enabled
    }

    pub fn state(&self) -> EngineState {
        if self
            .installed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
        {
            EngineState::Enabled
        } else {
            EngineState::Disabled
        }
    }

    /// Subscribes to [`PlaybackCompleted`] events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackCompleted> {
        self.bus.subscribe()
    }
}

impl Drop for MacroEngine {
    fn drop(&mut self) {
        self.disable();
    }
}

#[cfg(test)]
mod tests {
    use stratagem_core::{EngineSettings, SharedSettings, SlotTable, StratagemBook};

    use super::*;
    use crate::application::feedback::{MockAudioCue, MockStatusSink};
    use crate::infrastructure::key_synthesis::mock::MockKeySynthesizer;
    use crate::infrastructure::keyboard_hook::mock::MockKeyboardHook;

    fn engine(hook: MockKeyboardHook) -> MacroEngine {
        let mut audio = MockAudioCue::new();
        audio.expect_play().returning(|| Ok(()));
        let mut status = MockStatusSink::new();
        status.expect_show().returning(|_, _| Ok(()));
        MacroEngine::new(
            Handle::current(),
            EnginePorts {
                hook: Arc::new(hook),
                synthesizer: Arc::new(MockKeySynthesizer::new()),
                slots: Arc::new(SlotTable::numpad()),
                stratagems: Arc::new(StratagemBook::builtin()),
                settings: Arc::new(SharedSettings::new(EngineSettings::default())),
                audio: Arc::new(audio),
                status: Arc::new(status),
            },
        )
    }

    #[tokio::test]
    async fn test_new_engine_is_disabled() {
        let engine = engine(MockKeyboardHook::new());
        assert_eq!(engine.state(), EngineState::Disabled);
        assert!(!engine.is_enabled());
    }

    #[tokio::test]
    async fn test_enable_twice_installs_one_hook() {
        // Arrange
        let hook = MockKeyboardHook::new();
        let engine = engine(hook.clone());

        // Act
        engine.enable().unwrap();
        engine.enable().unwrap();

        // Assert
        assert_eq!(hook.install_count(), 1);
        assert!(engine.is_enabled());
    }

    #[tokio::test]
    async fn test_disable_releases_hook() {
        let hook = MockKeyboardHook::new();
        let engine = engine(hook.clone());
        engine.enable().unwrap();

        engine.disable();

        assert!(!hook.is_installed());
        assert_eq!(hook.release_count(), 1);
        assert_eq!(engine.state(), EngineState::Disabled);
    }

    #[tokio::test]
    async fn test_disable_when_never_enabled_is_a_no_op() {
        let hook = MockKeyboardHook::new();
        let engine = engine(hook.clone());

        engine.disable();
        engine.disable();

        assert_eq!(hook.release_count(), 0);
    }

    #[tokio::test]
    async fn test_install_failure_leaves_engine_disabled() {
        // Arrange
        let hook = MockKeyboardHook::new();
        hook.fail_next_install();
        let engine = engine(hook.clone());

        // Act
        let result = engine.enable();

        // Assert
        assert!(matches!(result, Err(EngineError::Hook(HookError::InstallFailed(_)))));
        assert_eq!(engine.state(), EngineState::Disabled);
        assert!(!hook.is_installed());
    }

    #[tokio::test]
    async fn test_drop_releases_hook() {
        let hook = MockKeyboardHook::new();
        {
            let engine = engine(hook.clone());
            engine.enable().unwrap();
        }
        assert!(!hook.is_installed());
    }

    #[tokio::test]
    async fn test_enable_disable_cycles_reinstall() {
        let hook = MockKeyboardHook::new();
        let engine = engine(hook.clone());

        for _ in 0..3 {
            engine.enable().unwrap();
            engine.disable();
        }

        assert_eq!(hook.install_count(), 3);
        assert_eq!(hook.release_count(), 3);
    }
}
