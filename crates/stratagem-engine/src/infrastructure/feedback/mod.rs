//! Feedback adapters: where the status line and the audio cue end up.
//!
//! The headless runner has no window, so the status line goes to the log.
//! On Windows the cue is the classic `Beep(1000 Hz, 200 ms)`; elsewhere it
//! is silent.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::application::feedback::{AudioCue, FeedbackError, StatusSink};

#[cfg(target_os = "windows")]
pub mod windows;

/// Writes status messages to the `tracing` log at `info`.
#[derive(Debug, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn show(&self, message: &str, duration: Duration) -> Result<(), FeedbackError> {
        info!(visible_ms = duration.as_millis() as u64, "{message}");
        Ok(())
    }
}

/// A cue that makes no sound.
#[derive(Debug, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Returns the audio cue for the current platform.
pub fn platform_audio_cue() -> Arc<dyn AudioCue> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::BeepCue::default())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(SilentCue)
    }
}
