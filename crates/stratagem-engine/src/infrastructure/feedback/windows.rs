//! Windows audio cue via the `Beep` API.

#![cfg(target_os = "windows")]

use windows::Win32::System::Diagnostics::Debug::Beep;

use crate::application::feedback::{AudioCue, FeedbackError};

/// Plays a fixed tone; blocks for its duration.
#[derive(Debug, Clone, Copy)]
pub struct BeepCue {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl Default for BeepCue {
    fn default() -> Self {
        Self {
            frequency_hz: 1000,
            duration_ms: 200,
        }
    }
}

impl AudioCue for BeepCue {
    fn play(&self) -> Result<(), FeedbackError> {
        // SAFETY: Beep takes plain integers and has no pointer arguments.
        unsafe { Beep(self.frequency_hz, self.duration_ms) }
            .map_err(|e| FeedbackError::Audio(e.to_string()))
    }
}
