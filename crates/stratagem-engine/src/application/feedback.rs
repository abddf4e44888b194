//! Completion side effects: the playback bus, the audio cue, and the status line.
//!
//! After a macro has been typed out in full, three things may happen:
//!
//! 1. A short status message (`"✓ {name} executed"`) is shown for 1.5 s, if
//!    visual feedback is enabled.
//! 2. An audible cue is played, if sound is enabled.
//! 3. A [`PlaybackCompleted`] event is broadcast to every subscriber.
//!
//! None of these may disturb playback.  Errors and panics raised by a sink
//! are caught here and only logged at `debug`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use stratagem_core::{Direction, EngineSettings};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// How long the status message stays visible.
pub const STATUS_DURATION: Duration = Duration::from_millis(1500);

/// Buffered events per subscriber before slow receivers start lagging.
pub const BUS_CAPACITY: usize = 64;

/// Broadcast once per fully completed playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCompleted {
    pub playback_id: Uuid,
    pub macro_name: String,
    pub sequence: Vec<Direction>,
    pub key_label: String,
}

/// Error type for feedback sinks.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("audio cue failed: {0}")]
    Audio(String),
    #[error("status sink failed: {0}")]
    Status(String),
}

/// Plays the "macro done" sound.  May block for the length of the cue.
#[cfg_attr(test, mockall::automock)]
pub trait AudioCue: Send + Sync {
    fn play(&self) -> Result<(), FeedbackError>;
}

/// Shows a transient status line to the user.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSink: Send + Sync {
    fn show(&self, message: &str, duration: Duration) -> Result<(), FeedbackError>;
}

/// Fan-out of [`PlaybackCompleted`] events.
#[derive(Debug, Clone)]
pub struct PlaybackBus {
    tx: broadcast::Sender<PlaybackCompleted>,
}

impl PlaybackBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackCompleted> {
        self.tx.subscribe()
    }

    /// Publishes `event`; having no subscribers is not an error.
    pub fn publish(&self, event: PlaybackCompleted) {
        if self.tx.send(event).is_err() {
            debug!("no playback subscribers");
        }
    }
}

impl Default for PlaybackBus {
    fn default() -> Self {
        Self::new(BUS_CAPACITY)
    }
}

/// The side effects fired after a completed playback.
#[derive(Clone)]
pub struct CompletionEffects {
    bus: PlaybackBus,
    audio: Arc<dyn AudioCue>,
    status: Arc<dyn StatusSink>,
}

impl CompletionEffects {
    pub fn new(bus: PlaybackBus, audio: Arc<dyn AudioCue>, status: Arc<dyn StatusSink>) -> Self {
        Self { bus, audio, status }
    }

    pub fn bus(&self) -> &PlaybackBus {
        &self.bus
    }

    /// Fires every enabled side effect for `event`, exactly once each.
    ///
    /// The status line and the cue run before the broadcast, so a subscriber
    /// that sees the event knows all feedback for it has already happened.
    pub async fn fire(&self, event: PlaybackCompleted, settings: &EngineSettings) {
        if settings.visual_enabled {
            let message = format!("✓ {} executed", event.macro_name);
            let status = Arc::clone(&self.status);
            match panic::catch_unwind(AssertUnwindSafe(|| {
                status.show(&message, STATUS_DURATION)
            })) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("status feedback discarded: {e}"),
                Err(_) => debug!("status sink panicked; discarded"),
            }
        }

        if settings.sound_enabled {
            // The cue may block (Beep does), so keep it off the async workers.
            let audio = Arc::clone(&self.audio);
            match tokio::task::spawn_blocking(move || audio.play()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("audio feedback discarded: {e}"),
                Err(e) => debug!("audio cue task failed: {e}"),
            }
        }

        self.bus.publish(event);
    }
}
