//! KeyDispatcher: decides, per physical key-down, whether to pass it through
//! or suppress it and play a stratagem.
//!
//! This runs synchronously on the hook thread for every key-down while the
//! engine is enabled, so it only performs lookups.  Playback is handed to the
//! [`PlaybackScheduler`].
//!
//! Decision order:
//!
//! 1. Numpad layout and the key is not on the keypad → pass through.
//! 2. No slot assignment for the key → pass through.
//! 3. Assigned → suppress.  If the stratagem name still resolves, schedule a
//!    playback; a stale name is suppressed without playback.

use std::sync::Arc;

use stratagem_core::{LayoutKind, SettingsSource, SlotRegistry, StratagemLookup};
use tracing::debug;

use super::play_macro::PlaybackRequest;
use super::schedule::{DispatchOutcome, PlaybackScheduler};
use crate::infrastructure::keyboard_hook::{HookVerdict, KeyDownEvent, KeyEventHandler};

/// The Dispatch Key use case.
pub struct KeyDispatcher {
    slots: Arc<dyn SlotRegistry>,
    stratagems: Arc<dyn StratagemLookup>,
    settings: Arc<dyn SettingsSource>,
    scheduler: Arc<PlaybackScheduler>,
}

impl KeyDispatcher {
    pub fn new(
        slots: Arc<dyn SlotRegistry>,
        stratagems: Arc<dyn StratagemLookup>,
        settings: Arc<dyn SettingsSource>,
        scheduler: Arc<PlaybackScheduler>,
    ) -> Self {
        Self {
            slots,
            stratagems,
            settings,
            scheduler,
        }
    }
}

impl KeyEventHandler for KeyDispatcher {
    fn on_key_down(&self, event: &KeyDownEvent) -> HookVerdict {
        let settings = self.settings.snapshot();
        if settings.layout == LayoutKind::Numpad && !event.is_keypad {
            return HookVerdict::PassThrough;
        }

        let Some(assignment) = self.slots.lookup(event.key) else {
            return HookVerdict::PassThrough;
        };

        match self.stratagems.lookup(&assignment.macro_name) {
            Some(sequence) => {
                let request = PlaybackRequest::new(
                    assignment.macro_name,
                    sequence,
                    assignment.key_label,
                    settings,
                );
                match self.scheduler.dispatch(event.key, request) {
                    DispatchOutcome::Scheduled(playback_id) => {
                        debug!(key = %event.key, %playback_id, "playback scheduled");
                    }
                    outcome => debug!(key = %event.key, ?outcome, "trigger not scheduled"),
                }
            }
            None => {
                debug!(
                    key = %event.key,
                    macro_name = %assignment.macro_name,
                    "assigned stratagem no longer exists; suppressing only"
                );
            }
        }
        HookVerdict::Suppress
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::mock;
    use mockall::predicate::eq;
    use stratagem_core::{
        BindingScheme, Direction, EngineSettings, PhysicalKeyId, SlotAssignment,
    };
    use tokio::runtime::Handle;

    use super::*;
    use crate::application::feedback::{CompletionEffects, MockAudioCue, MockStatusSink, PlaybackBus};
    use crate::application::play_macro::{EmissionGate, MacroPlayer};
    use crate::infrastructure::key_synthesis::mock::MockKeySynthesizer;

    mock! {
        Slots {}
        impl SlotRegistry for Slots {
            fn lookup(&self, key: PhysicalKeyId) -> Option<SlotAssignment>;
        }
    }

    mock! {
        Book {}
        impl StratagemLookup for Book {
            fn lookup(&self, name: &str) -> Option<Vec<Direction>>;
        }
    }

    mock! {
        Settings {}
        impl SettingsSource for Settings {
            fn snapshot(&self) -> EngineSettings;
        }
    }

    fn settings_with(layout: LayoutKind) -> MockSettings {
        let mut settings = MockSettings::new();
        settings.expect_snapshot().returning(move || EngineSettings {
            latency_ms: 1,
            binding_scheme: BindingScheme::Arrows,
            layout,
            ..EngineSettings::default()
        });
        settings
    }

    fn running_scheduler(synth: Arc<MockKeySynthesizer>) -> Arc<PlaybackScheduler> {
        let mut audio = MockAudioCue::new();
        audio.expect_play().returning(|| Ok(()));
        let mut status = MockStatusSink::new();
        status.expect_show().returning(|_, _| Ok(()));
        let effects =
            CompletionEffects::new(PlaybackBus::default(), Arc::new(audio), Arc::new(status));
        let player = Arc::new(MacroPlayer::new(Arc::new(EmissionGate::new(synth)), effects));
        let scheduler = Arc::new(PlaybackScheduler::new(Handle::current(), player));
        scheduler.resume();
        scheduler
    }

    fn keypad(scan: u16) -> KeyDownEvent {
        KeyDownEvent {
            key: PhysicalKeyId(scan),
            vk_code: 0,
            is_extended: false,
            is_keypad: true,
        }
    }

    fn assignment(name: &str) -> SlotAssignment {
        SlotAssignment {
            macro_name: name.to_string(),
            key_label: "7".to_string(),
        }
    }

    async fn settle(scheduler: &PlaybackScheduler) {
        while scheduler.in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    #[tokio::test]
    async fn test_unassigned_key_passes_through() {
        // Arrange
        let mut slots = MockSlots::new();
        slots.expect_lookup().returning(|_| None);
        let mut book = MockBook::new();
        book.expect_lookup().never();
        let synth = Arc::new(MockKeySynthesizer::new());
        let dispatcher = KeyDispatcher::new(
            Arc::new(slots),
            Arc::new(book),
            Arc::new(settings_with(LayoutKind::Numpad)),
            running_scheduler(synth.clone()),
        );

        // Act
        let verdict = dispatcher.on_key_down(&keypad(76));

        // Assert
        assert_eq!(verdict, HookVerdict::PassThrough);
        assert!(synth.is_empty());
    }

    #[tokio::test]
    async fn test_non_keypad_key_passes_through_under_numpad_layout() {
        let mut slots = MockSlots::new();
        slots.expect_lookup().never();
        let dispatcher = KeyDispatcher::new(
            Arc::new(slots),
            Arc::new(MockBook::new()),
            Arc::new(settings_with(LayoutKind::Numpad)),
            running_scheduler(Arc::new(MockKeySynthesizer::new())),
        );
        let mut event = keypad(71);
        event.is_keypad = false;

        assert_eq!(dispatcher.on_key_down(&event), HookVerdict::PassThrough);
    }

    #[tokio::test]
    async fn test_custom_layout_consults_registry_for_any_key() {
        let mut slots = MockSlots::new();
        slots
            .expect_lookup()
            .with(eq(PhysicalKeyId(16)))
            .times(1)
            .returning(|_| None);
        let dispatcher = KeyDispatcher::new(
            Arc::new(slots),
            Arc::new(MockBook::new()),
            Arc::new(settings_with(LayoutKind::Custom)),
            running_scheduler(Arc::new(MockKeySynthesizer::new())),
        );
        let mut event = keypad(16);
        event.is_keypad = false;

        assert_eq!(dispatcher.on_key_down(&event), HookVerdict::PassThrough);
    }

    #[tokio::test]
    async fn test_assigned_key_is_suppressed_and_played() {
        // Arrange
        let mut slots = MockSlots::new();
        slots
            .expect_lookup()
            .with(eq(PhysicalKeyId(71)))
            .returning(|_| Some(assignment("Reinforce")));
        let mut book = MockBook::new();
        book.expect_lookup()
            .withf(|name| name == "Reinforce")
            .returning(|_| Some(vec![Direction::Up, Direction::Down]));
        let synth = Arc::new(MockKeySynthesizer::new());
        let scheduler = running_scheduler(synth.clone());
        let dispatcher = KeyDispatcher::new(
            Arc::new(slots),
            Arc::new(book),
            Arc::new(settings_with(LayoutKind::Numpad)),
            Arc::clone(&scheduler),
        );

        // Act
        let verdict = dispatcher.on_key_down(&keypad(71));
        settle(&scheduler).await;

        // Assert
        assert_eq!(verdict, HookVerdict::Suppress);
        assert_eq!(
            synth.presses(),
            vec![stratagem_core::OutputKey::ArrowUp, stratagem_core::OutputKey::ArrowDown]
        );
    }

    #[tokio::test]
    async fn test_stale_macro_name_is_suppressed_without_playback() {
        let mut slots = MockSlots::new();
        slots
            .expect_lookup()
            .returning(|_| Some(assignment("Deleted Macro")));
        let mut book = MockBook::new();
        book.expect_lookup().returning(|_| None);
        let synth = Arc::new(MockKeySynthesizer::new());
        let scheduler = running_scheduler(synth.clone());
        let dispatcher = KeyDispatcher::new(
            Arc::new(slots),
            Arc::new(book),
            Arc::new(settings_with(LayoutKind::Numpad)),
            Arc::clone(&scheduler),
        );

        let verdict = dispatcher.on_key_down(&keypad(72));
        settle(&scheduler).await;

        assert_eq!(verdict, HookVerdict::Suppress);
        assert!(synth.is_empty());
    }

    #[tokio::test]
    async fn test_settings_are_read_on_every_trigger() {
        let mut slots = MockSlots::new();
        slots.expect_lookup().returning(|_| None);
        let mut settings = MockSettings::new();
        settings
            .expect_snapshot()
            .times(3)
            .returning(EngineSettings::default);
        let dispatcher = KeyDispatcher::new(
            Arc::new(slots),
            Arc::new(MockBook::new()),
            Arc::new(settings),
            running_scheduler(Arc::new(MockKeySynthesizer::new())),
        );

        for _ in 0..3 {
            dispatcher.on_key_down(&keypad(79));
        }
    }
}
